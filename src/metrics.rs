//! Metrics facade: three narrow trait objects (`Counter`, `Gauge`, `Timer`)
//! behind an explicitly constructed registry, rather than a singleton
//! discovered at link time. The core never talks to a concrete metrics
//! backend directly — it asks the registry for a named instrument and
//! records through the trait.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub trait Counter: Send + Sync {
    fn increment(&self, delta: u64);
}

pub trait Gauge: Send + Sync {
    fn set(&self, value: i64);
}

pub trait Timer: Send + Sync {
    fn record(&self, duration: Duration);
}

/// Free-form string-pair tags attached to one instrument lookup, e.g.
/// `&[("result", "matched")]`. An empty slice names the bare, untagged
/// instrument.
pub type Tags<'a> = &'a [(&'a str, &'a str)];

/// Render `name` plus its tags into one flat key, e.g.
/// `helios.evaluator.events_total{result="matched"}`. Tags are sorted by
/// key first so the same tag set always produces the same key regardless
/// of call-site ordering.
fn tagged_key(name: &str, tags: Tags<'_>) -> String {
    if tags.is_empty() {
        return name.to_string();
    }
    let mut sorted: Vec<_> = tags.to_vec();
    sorted.sort_unstable_by_key(|(k, _)| *k);
    let pairs: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
    format!("{name}{{{}}}", pairs.join(","))
}

/// A provider of named instruments. Implementations back these with
/// whatever transport they like (Prometheus, StatsD, in-memory for tests);
/// the core only ever sees the `Counter`/`Gauge`/`Timer` traits above.
pub trait MetricsProvider: Send + Sync {
    fn counter(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Counter>;
    fn gauge(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Gauge>;
    fn timer(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Timer>;

    /// Render current values as Prometheus text exposition format, if this
    /// provider supports it. The HTTP wrapper's `/metrics` route calls this;
    /// the default `NoopProvider` returns an empty string.
    fn render_prometheus(&self) -> String {
        String::new()
    }
}

/// Does nothing. The default when no provider has been installed, so the
/// core never has to null-check before recording a measurement.
#[derive(Default)]
pub struct NoopProvider;

struct NoopCounter;
impl Counter for NoopCounter {
    fn increment(&self, _delta: u64) {}
}
struct NoopGauge;
impl Gauge for NoopGauge {
    fn set(&self, _value: i64) {}
}
struct NoopTimer;
impl Timer for NoopTimer {
    fn record(&self, _duration: Duration) {}
}

impl MetricsProvider for NoopProvider {
    fn counter(&self, _name: &str, _tags: Tags<'_>) -> Arc<dyn Counter> {
        Arc::new(NoopCounter)
    }
    fn gauge(&self, _name: &str, _tags: Tags<'_>) -> Arc<dyn Gauge> {
        Arc::new(NoopGauge)
    }
    fn timer(&self, _name: &str, _tags: Tags<'_>) -> Arc<dyn Timer> {
        Arc::new(NoopTimer)
    }
}

/// A simple in-memory provider suitable for `/metrics` in a standalone
/// deployment and for assertions in tests. Production deployments that
/// need a real Prometheus/StatsD transport install their own provider
/// instead — wiring up that transport is explicitly out of scope here.
#[derive(Default)]
pub struct InMemoryProvider {
    counters: RwLock<HashMap<String, Arc<AtomicCounter>>>,
    gauges: RwLock<HashMap<String, Arc<AtomicGauge>>>,
    timers: RwLock<HashMap<String, Arc<RecordingTimer>>>,
}

#[derive(Default)]
struct AtomicCounter(AtomicU64);
impl Counter for AtomicCounter {
    fn increment(&self, delta: u64) {
        self.0.fetch_add(delta, Ordering::Relaxed);
    }
}

#[derive(Default)]
struct AtomicGauge(AtomicI64);
impl Gauge for AtomicGauge {
    fn set(&self, value: i64) {
        self.0.store(value, Ordering::Relaxed);
    }
}

#[derive(Default)]
struct RecordingTimer {
    count: AtomicU64,
    total_nanos: AtomicU64,
}
impl Timer for RecordingTimer {
    fn record(&self, duration: Duration) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsProvider for InMemoryProvider {
    fn counter(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Counter> {
        let key = tagged_key(name, tags);
        if let Some(existing) = self.counters.read().get(&key) {
            return existing.clone();
        }
        self.counters
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicCounter::default()))
            .clone()
    }

    fn gauge(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Gauge> {
        let key = tagged_key(name, tags);
        if let Some(existing) = self.gauges.read().get(&key) {
            return existing.clone();
        }
        self.gauges
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicGauge::default()))
            .clone()
    }

    fn timer(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Timer> {
        let key = tagged_key(name, tags);
        if let Some(existing) = self.timers.read().get(&key) {
            return existing.clone();
        }
        self.timers
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(RecordingTimer::default()))
            .clone()
    }

    fn render_prometheus(&self) -> String {
        let mut out = String::new();
        for (key, counter) in self.counters.read().iter() {
            let base = key.split('{').next().unwrap_or(key);
            out.push_str(&format!(
                "# TYPE {base} counter\n{key} {}\n",
                counter.0.load(Ordering::Relaxed)
            ));
        }
        for (key, gauge) in self.gauges.read().iter() {
            let base = key.split('{').next().unwrap_or(key);
            out.push_str(&format!(
                "# TYPE {base} gauge\n{key} {}\n",
                gauge.0.load(Ordering::Relaxed)
            ));
        }
        for (key, timer) in self.timers.read().iter() {
            let base = key.split('{').next().unwrap_or(key);
            let count = timer.count.load(Ordering::Relaxed);
            let total = timer.total_nanos.load(Ordering::Relaxed);
            out.push_str(&format!(
                "# TYPE {base} summary\n{key}_count {count}\n{key}_sum_nanos {total}\n"
            ));
        }
        out
    }
}

/// Explicitly constructed facade in front of one installed `MetricsProvider`.
/// There is no global static here — an embedder builds a `MetricsRegistry`
/// and threads it through, same as `ModelManager`.
pub struct MetricsRegistry {
    provider: Arc<dyn MetricsProvider>,
}

impl MetricsRegistry {
    /// A registry backed by the no-op provider.
    pub fn noop() -> Self {
        Self {
            provider: Arc::new(NoopProvider),
        }
    }

    /// A registry backed by the in-memory provider, suitable for a
    /// standalone deployment's `/metrics` endpoint.
    pub fn in_memory() -> Self {
        Self {
            provider: Arc::new(InMemoryProvider::new()),
        }
    }

    /// Install a specific provider, e.g. one an embedder wrote to bridge to
    /// their own observability stack.
    pub fn with_provider(provider: Arc<dyn MetricsProvider>) -> Self {
        Self { provider }
    }

    pub fn counter(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Counter> {
        self.provider.counter(name, tags)
    }

    pub fn gauge(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Gauge> {
        self.provider.gauge(name, tags)
    }

    pub fn timer(&self, name: &str, tags: Tags<'_>) -> Arc<dyn Timer> {
        self.provider.timer(name, tags)
    }

    pub fn render_prometheus(&self) -> String {
        self.provider.render_prometheus()
    }
}

/// Metric names defined by the evaluator and model manager.
pub mod names {
    pub const EVENTS_TOTAL: &str = "helios.evaluator.events_total";
    pub const PREDICATES_EVALUATED_TOTAL: &str = "helios.evaluator.predicates_evaluated_total";
    pub const LATENCY: &str = "helios.evaluator.latency";
    pub const MODEL_NUM_RULES: &str = "helios.model.num_rules";
    pub const MODEL_NUM_PREDICATES: &str = "helios.model.num_predicates";
}
