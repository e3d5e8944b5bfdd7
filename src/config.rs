//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (`HELIOS_*` prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [http]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [pool]
//! max_contexts = 256
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! HELIOS_HTTP__PORT=9090
//! HELIOS_LOGGING__LEVEL=debug
//! ```

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Context pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Upper bound on concurrently held executor contexts. 0 means
    /// unbounded (one per distinct calling thread, which is itself bounded
    /// by the async runtime's worker thread count).
    #[serde(default)]
    pub max_contexts: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig { max_contexts: 0 }
    }
}

/// HTTP wrapper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Explicit allowed CORS origins. Empty + `cors_allow_all = false` means
    /// same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub cors_allow_all: bool,

    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,

    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            cors_allow_all: false,
            body_limit_bytes: default_body_limit_bytes(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit_bytes() -> usize {
    1024 * 1024
}
fn default_shutdown_timeout_secs() -> u64 {
    10
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether to back the registry with the in-memory provider (exposed at
    /// `/metrics`) instead of the no-op provider. Wiring a real Prometheus
    /// or StatsD transport is left to the embedder.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig { enabled: default_true() }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default locations, merged in order:
    /// 1. `config.toml` (base configuration)
    /// 2. `config.local.toml` (local overrides, git-ignored)
    /// 3. Environment variables (`HELIOS_*` prefix, `__` path separator)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("HELIOS_").split("__"))
            .extract()
    }

    /// Load configuration from a specific file path.
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("HELIOS_").split("__"))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool: PoolConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, "127.0.0.1");
        assert!(config.metrics.enabled);
        assert_eq!(config.pool.max_contexts, 0);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[http]"));
        assert!(toml_str.contains("[pool]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn env_override_splits_on_double_underscore() {
        // Figment's Env::split("__") maps HELIOS_HTTP__PORT to http.port.
        std::env::set_var("HELIOS_HTTP__PORT", "9999");
        let config: Config = Figment::new()
            .merge(figment::providers::Serialized::defaults(Config::default()))
            .merge(Env::prefixed("HELIOS_").split("__"))
            .extract()
            .unwrap();
        std::env::remove_var("HELIOS_HTTP__PORT");
        assert_eq!(config.http.port, 9999);
    }
}
