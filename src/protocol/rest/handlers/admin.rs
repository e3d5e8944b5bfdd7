//! Health, readiness, and metrics endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;

use crate::evaluator::RuleEvaluator;
use crate::protocol::rest::dto::{ApiResponse, HealthDto, ReadyDto};

/// Process start time, used to compute `HealthDto::uptime_secs`.
#[derive(Clone, Copy)]
pub struct StartTime(pub Instant);

/// `GET /health` — liveness. Always 200 while the process can answer HTTP
/// at all; does not depend on a model being published.
pub async fn health(
    Extension(start): Extension<StartTime>,
) -> Json<ApiResponse<HealthDto>> {
    Json(ApiResponse::success(HealthDto {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: start.0.elapsed().as_secs(),
    }))
}

/// `GET /ready` — readiness. 200 iff a model has been published, else 503.
pub async fn ready(
    Extension(evaluator): Extension<Arc<RuleEvaluator>>,
) -> (StatusCode, Json<ApiResponse<ReadyDto>>) {
    let is_ready = evaluator.is_ready();
    let status = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ApiResponse::success(ReadyDto { ready: is_ready })))
}

/// `GET /metrics` — Prometheus text exposition of whatever the installed
/// `MetricsProvider` can render. The no-op provider renders an empty body.
pub async fn metrics(Extension(evaluator): Extension<Arc<RuleEvaluator>>) -> String {
    evaluator.metrics().render_prometheus()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ModelManager;
    use crate::metrics::MetricsRegistry;

    #[tokio::test]
    async fn health_reports_healthy_status() {
        let start = StartTime(Instant::now());
        let Json(resp) = health(Extension(start)).await;
        assert!(resp.success);
        assert_eq!(resp.data.unwrap().status, "healthy");
    }

    #[tokio::test]
    async fn ready_is_false_without_published_model() {
        let evaluator = Arc::new(RuleEvaluator::new(ModelManager::new(), MetricsRegistry::noop()));
        let (status, Json(resp)) = ready(Extension(evaluator)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!resp.data.unwrap().ready);
    }

    #[tokio::test]
    async fn ready_is_true_after_publish() {
        use crate::model::EngineModelBuilder;
        let manager = ModelManager::with_model(EngineModelBuilder::new().build());
        let evaluator = Arc::new(RuleEvaluator::new(manager, MetricsRegistry::noop()));
        let (status, Json(resp)) = ready(Extension(evaluator)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(resp.data.unwrap().ready);
    }

    #[tokio::test]
    async fn metrics_renders_in_memory_provider_output() {
        let manager = ModelManager::new();
        let evaluator = Arc::new(RuleEvaluator::new(manager, MetricsRegistry::in_memory()));
        evaluator
            .metrics()
            .counter(crate::metrics::names::EVENTS_TOTAL, &[])
            .increment(1);
        let body = metrics(Extension(evaluator)).await;
        assert!(body.contains("helios.evaluator.events_total 1"));
    }
}
