//! The counting matcher: evaluates one event against the published model
//! using a pooled, allocation-free context.
//!
//! Algorithm, matching the component design exactly:
//! 1. Load the model once (an `Arc`, cheap to clone, pins this evaluation's
//!    view even if a hot-swap happens mid-flight).
//! 2. Validate the event: reject duplicate attribute names and attribute
//!    values whose kind disagrees with the model's recorded field kind.
//! 3. For each attribute, probe the predicate index; each hit marks that
//!    predicate true and increments the counter of every rule in its
//!    posting list.
//! 4. A rule matches the instant its counter reaches its threshold
//!    (predicate count) — counters only ever increase within one
//!    evaluation, so equality, not `>=`, is the correct and sufficient test.
//! 5. Collect matched rule codes in a deterministic order (ascending
//!    `RuleId`, i.e. compile order) regardless of attribute iteration order.
//! 6. Release the context back to the pool (via `Drop` on the guard) no
//!    matter which of the above steps returned early.

use crate::config::PoolConfig;
use crate::error::{EngineError, EngineResult};
use crate::event::Event;
use crate::manager::ModelManager;
use crate::metrics::{names, MetricsRegistry};
use crate::model::EngineModel;
use crate::pool::ContextPool;
use std::collections::HashSet;
use std::time::Instant;

/// The result of evaluating one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub event_id: String,
    pub matched_rule_codes: Vec<String>,
    /// Number of predicate *activations* (false→true transitions) during
    /// this evaluation, not the number of index probes performed.
    pub predicates_evaluated: u64,
}

pub struct RuleEvaluator {
    manager: ModelManager,
    pool: ContextPool,
    metrics: MetricsRegistry,
}

impl RuleEvaluator {
    /// An evaluator with an unbounded context pool — one context per
    /// calling thread, with no ceiling on how many threads may hold one.
    pub fn new(manager: ModelManager, metrics: MetricsRegistry) -> Self {
        Self {
            manager,
            pool: ContextPool::new(),
            metrics,
        }
    }

    /// An evaluator whose context pool is bounded by `pool_config.max_contexts`.
    pub fn with_pool_config(manager: ModelManager, metrics: MetricsRegistry, pool_config: &PoolConfig) -> Self {
        Self {
            manager,
            pool: ContextPool::with_max_contexts(pool_config.max_contexts),
            metrics,
        }
    }

    pub fn manager(&self) -> &ModelManager {
        &self.manager
    }

    pub fn is_ready(&self) -> bool {
        self.manager.is_ready()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn evaluate(&self, event: &Event) -> EngineResult<MatchResult> {
        let start = Instant::now();
        let model = self.manager.load().ok_or(EngineError::ModelNotLoaded)?;

        if let Err(err) = validate_event(&model, event) {
            self.metrics
                .counter(names::EVENTS_TOTAL, &[("result", "invalid")])
                .increment(1);
            return Err(err);
        }

        let mut guard = self.pool.acquire(model.num_predicates(), model.num_rules())?;

        let mut predicates_evaluated: u64 = 0;
        for (field_name, value) in &event.attributes {
            let Some(field_id) = model.field_id(field_name) else {
                continue;
            };
            for &predicate_id in model.index().lookup(field_id, value) {
                if guard.is_predicate_true(predicate_id) {
                    continue;
                }
                guard.mark_predicate_true(predicate_id);
                predicates_evaluated += 1;

                for &rule_id in model.index().rules_for(predicate_id) {
                    let rule = model.rule(rule_id);
                    let counter = guard.increment_rule(rule_id);
                    if counter > rule.threshold {
                        return Err(EngineError::ModelInvariantViolated {
                            fingerprint: model.fingerprint(),
                            detail: format!(
                                "rule {} counter {counter} exceeded threshold {}",
                                rule.rule_code, rule.threshold
                            ),
                        });
                    }
                }
            }
        }

        let mut matched: Vec<_> = guard
            .touched_rules()
            .iter()
            .filter(|&&rule_id| guard.counter(rule_id) == model.rule(rule_id).threshold)
            .map(|&rule_id| (rule_id, model.rule(rule_id).rule_code.to_string()))
            .collect();
        matched.sort_by_key(|(rule_id, _)| rule_id.0);

        drop(guard);

        let result_tag = if matched.is_empty() { "unmatched" } else { "matched" };
        self.metrics
            .counter(names::EVENTS_TOTAL, &[("result", result_tag)])
            .increment(1);
        self.metrics
            .counter(names::PREDICATES_EVALUATED_TOTAL, &[])
            .increment(predicates_evaluated);
        self.metrics.timer(names::LATENCY, &[]).record(start.elapsed());
        self.metrics
            .gauge(names::MODEL_NUM_RULES, &[])
            .set(model.num_rules() as i64);
        self.metrics
            .gauge(names::MODEL_NUM_PREDICATES, &[])
            .set(model.num_predicates() as i64);

        Ok(MatchResult {
            event_id: event.event_id.clone(),
            matched_rule_codes: matched.into_iter().map(|(_, code)| code).collect(),
            predicates_evaluated,
        })
    }
}

fn validate_event(model: &EngineModel, event: &Event) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(event.attributes.len());
    for (field_name, value) in &event.attributes {
        if !seen.insert(field_name.as_str()) {
            return Err(EngineError::InvalidEvent(format!(
                "duplicate attribute {field_name:?}"
            )));
        }
        if let Some(field_id) = model.field_id(field_name) {
            let expected = model.field_kind(field_id);
            if value.kind() != expected {
                return Err(EngineError::InvalidEvent(format!(
                    "attribute {field_name:?} has kind {:?}, expected {expected:?}",
                    value.kind()
                )));
            }
        }
    }
    Ok(())
}
