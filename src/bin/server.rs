//! Helios HTTP Server Binary
//!
//! Loads a rule source, compiles it into an `EngineModel`, publishes it to a
//! `ModelManager`, and serves `/evaluate`, `/health`, `/ready`, `/metrics`
//! over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin helios-server -- --rules rules.jsonl
//! cargo run --bin helios-server -- --rules rules.jsonl --config config.toml
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helios::config::Config;
use helios::manager::ModelManager;
use helios::metrics::MetricsRegistry;
use helios::protocol::rest::start_http_server;
use helios::{compiler, RuleEvaluator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Helios rule-matching engine server")]
struct Args {
    /// Path to a rule source file (one JSON object per line, see compiler module docs)
    #[arg(long)]
    rules: Option<String>,

    /// Path to a config.toml file. Defaults to the standard Figment search
    /// (config.toml, config.local.toml, HELIOS_* env vars) when omitted.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    init_tracing(&config.logging);

    let manager = ModelManager::new();
    match &args.rules {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read rule source {path:?}: {e}"))?;
            let model = compiler::compile(&source)
                .map_err(|e| anyhow::anyhow!("failed to compile rule source {path:?}: {e}"))?;
            tracing::info!(
                num_rules = model.num_rules(),
                num_predicates = model.num_predicates(),
                "published initial rule model"
            );
            manager.publish(model);
        }
        None => {
            tracing::warn!("no --rules path given; starting with no model published (/ready will report 503 until one is loaded)");
        }
    }

    let metrics = if config.metrics.enabled {
        MetricsRegistry::in_memory()
    } else {
        MetricsRegistry::noop()
    };

    let evaluator = Arc::new(RuleEvaluator::with_pool_config(manager, metrics, &config.pool));

    start_http_server(evaluator, &config.http)
        .await
        .map_err(|e| anyhow::anyhow!("http server error: {e}"))?;

    Ok(())
}

fn init_tracing(logging: &helios::config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    if logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
