//! The `/evaluate` endpoint: the one piece of business logic this HTTP
//! wrapper exists to expose.

use std::sync::Arc;

use axum::{Extension, Json};

use crate::event::Event;
use crate::evaluator::RuleEvaluator;
use crate::protocol::rest::dto::{ApiResponse, EvaluateRequest, MatchResultDto};
use crate::protocol::rest::error::RestError;
use crate::value::Scalar;

fn json_to_scalar(value: &serde_json::Value) -> Option<Scalar> {
    match value {
        serde_json::Value::String(s) => Some(Scalar::from(s.as_str())),
        serde_json::Value::Bool(b) => Some(Scalar::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Scalar::Int64(i))
            } else {
                n.as_f64().map(Scalar::Float64)
            }
        }
        _ => None,
    }
}

/// `POST /evaluate` — evaluate one event against the published model.
///
/// Runs on a blocking-pool thread via `spawn_blocking` so the CPU-bound,
/// never-yielding `evaluate` call doesn't stall the async reactor serving
/// other connections.
pub async fn evaluate(
    Extension(evaluator): Extension<Arc<RuleEvaluator>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ApiResponse<MatchResultDto>>, RestError> {
    let event_id = request
        .event_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut event = Event::new(event_id, request.event_type);
    for (field, value) in &request.attributes {
        let Some(scalar) = json_to_scalar(value) else {
            return Err(RestError::bad_request(format!(
                "attribute {field:?} has an unsupported value type (expected string, number, or bool)"
            )));
        };
        event.attributes.push((field.clone(), scalar));
    }

    let result = tokio::task::spawn_blocking(move || evaluator.evaluate(&event))
        .await
        .map_err(|e| RestError::internal(format!("evaluation task panicked: {e}")))??;

    Ok(Json(ApiResponse::success(MatchResultDto {
        event_id: result.event_id,
        matched_rule_codes: result.matched_rule_codes,
        predicates_evaluated: result.predicates_evaluated,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ModelManager;
    use crate::metrics::MetricsRegistry;
    use crate::model::{EngineModelBuilder, Operator};

    fn evaluator() -> Arc<RuleEvaluator> {
        let mut builder = EngineModelBuilder::new();
        builder.add_rule("R1", vec![("country", Operator::EqualTo, Scalar::from("US"))]);
        let manager = ModelManager::with_model(builder.build());
        Arc::new(RuleEvaluator::new(manager, MetricsRegistry::noop()))
    }

    #[tokio::test]
    async fn evaluate_assigns_event_id_when_absent() {
        let request = EvaluateRequest {
            event_id: None,
            event_type: "checkout".to_string(),
            attributes: vec![("country".to_string(), serde_json::json!("US"))],
        };
        let Json(resp) = evaluate(Extension(evaluator()), Json(request)).await.unwrap();
        let data = resp.data.unwrap();
        assert!(!data.event_id.is_empty());
        assert_eq!(data.matched_rule_codes, vec!["R1"]);
    }

    #[tokio::test]
    async fn evaluate_rejects_unsupported_value_type() {
        let request = EvaluateRequest {
            event_id: Some("e1".to_string()),
            event_type: "checkout".to_string(),
            attributes: vec![("country".to_string(), serde_json::json!(null))],
        };
        let err = evaluate(Extension(evaluator()), Json(request)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evaluate_maps_model_not_loaded_to_503() {
        let unready = Arc::new(RuleEvaluator::new(ModelManager::new(), MetricsRegistry::noop()));
        let request = EvaluateRequest {
            event_id: Some("e1".to_string()),
            event_type: "checkout".to_string(),
            attributes: vec![],
        };
        let err = evaluate(Extension(unready), Json(request)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn evaluate_maps_duplicate_attribute_to_400() {
        let request = EvaluateRequest {
            event_id: Some("e1".to_string()),
            event_type: "checkout".to_string(),
            attributes: vec![
                ("country".to_string(), serde_json::json!("US")),
                ("country".to_string(), serde_json::json!("CA")),
            ],
        };
        let err = evaluate(Extension(evaluator()), Json(request)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
