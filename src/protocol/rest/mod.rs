//! HTTP API Module
//!
//! Builds the `axum` router and drives the server's lifecycle: bind,
//! serve, graceful shutdown on SIGINT/SIGTERM.

pub mod dto;
pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, routing::post, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::config::HttpConfig;
use crate::evaluator::RuleEvaluator;

use self::handlers::admin::{self, StartTime};
use self::handlers::evaluate;

/// Build the router. Split out from `start_http_server` so integration
/// tests can drive it directly with `tower::ServiceExt::oneshot` without
/// binding a real socket.
pub fn create_router(evaluator: Arc<RuleEvaluator>, config: &HttpConfig) -> Router {
    let cors = if !config.cors_origins.is_empty() {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| {
                let parsed = s.parse();
                if parsed.is_err() {
                    tracing::warn!(origin = %s, "invalid CORS origin ignored");
                }
                parsed.ok()
            })
            .collect();
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if config.cors_allow_all {
        Some(CorsLayer::permissive())
    } else {
        None
    };

    let mut app = Router::new()
        .route("/evaluate", post(evaluate::evaluate))
        .route("/health", get(admin::health))
        .route("/ready", get(admin::ready))
        .route("/metrics", get(admin::metrics))
        .layer(Extension(evaluator))
        .layer(Extension(StartTime(Instant::now())))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    app
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Listens for SIGINT (ctrl-c) and SIGTERM; on shutdown, stops accepting
/// new connections and lets in-flight requests drain.
pub async fn start_http_server(
    evaluator: Arc<RuleEvaluator>,
    config: &HttpConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(evaluator, config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "helios HTTP server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => { info!("received SIGINT, shutting down"); }
            _ = sigterm.recv() => { info!("received SIGTERM, shutting down"); }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for ctrl-c");
        info!("received SIGINT, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ModelManager;
    use crate::metrics::MetricsRegistry;
    use crate::model::{EngineModelBuilder, Operator};
    use crate::value::Scalar;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_evaluator() -> Arc<RuleEvaluator> {
        let mut builder = EngineModelBuilder::new();
        builder.add_rule("R1", vec![("country", Operator::EqualTo, Scalar::from("US"))]);
        let manager = ModelManager::with_model(builder.build());
        Arc::new(RuleEvaluator::new(manager, MetricsRegistry::in_memory()))
    }

    #[tokio::test]
    async fn health_endpoint_returns_200() {
        let app = create_router(make_evaluator(), &HttpConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_reflects_model_state() {
        let app = create_router(make_evaluator(), &HttpConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_is_503_without_model() {
        let evaluator = Arc::new(RuleEvaluator::new(ModelManager::new(), MetricsRegistry::noop()));
        let app = create_router(evaluator, &HttpConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn evaluate_endpoint_returns_match() {
        let app = create_router(make_evaluator(), &HttpConfig::default());
        let body = r#"{"event_type": "checkout", "attributes": {"country": "US"}}"#;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn evaluate_endpoint_returns_503_without_model() {
        let evaluator = Arc::new(RuleEvaluator::new(ModelManager::new(), MetricsRegistry::noop()));
        let app = create_router(evaluator, &HttpConfig::default());
        let body = r#"{"event_type": "checkout", "attributes": {}}"#;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_200() {
        let app = create_router(make_evaluator(), &HttpConfig::default());
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
