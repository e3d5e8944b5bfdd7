//! S8: the HTTP wrapper's status-code mapping, driven through the real
//! router via `tower::ServiceExt::oneshot` rather than a bound socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helios::config::HttpConfig;
use helios::manager::ModelManager;
use helios::metrics::MetricsRegistry;
use helios::model::{EngineModelBuilder, Operator};
use helios::protocol::rest::create_router;
use helios::value::Scalar;
use helios::RuleEvaluator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router_with_model() -> axum::Router {
    let mut builder = EngineModelBuilder::new();
    builder.add_rule("checkout-us", vec![("country", Operator::EqualTo, Scalar::from("US"))]);
    let manager = ModelManager::with_model(builder.build());
    let evaluator = Arc::new(RuleEvaluator::new(manager, MetricsRegistry::in_memory()));
    create_router(evaluator, &HttpConfig::default())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn successful_match_is_200_with_documented_shape() {
    let app = router_with_model();
    let body = json!({"event_type": "checkout", "attributes": {"country": "US"}}).to_string();
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
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["matched_rule_codes"], json!(["checkout-us"]));
    assert_eq!(body["data"]["predicates_evaluated"], json!(1));
    assert!(body["data"]["event_id"].is_string());
}

#[tokio::test]
async fn duplicate_attribute_is_400() {
    let app = router_with_model();
    // Hand-crafted body with a repeated "country" key; serde_json's raw
    // string form preserves the duplicate the way a real client could send it.
    let body = r#"{"event_type": "checkout", "attributes": {"country": "US", "country": "CA"}}"#;
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
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn absent_model_is_503() {
    let evaluator = Arc::new(RuleEvaluator::new(ModelManager::new(), MetricsRegistry::noop()));
    let app = create_router(evaluator, &HttpConfig::default());
    let body = json!({"event_type": "checkout", "attributes": {}}).to_string();
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
