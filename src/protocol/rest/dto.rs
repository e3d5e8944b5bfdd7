//! HTTP API Data Transfer Objects
//!
//! Defines request/response types for the evaluate, health, and readiness
//! endpoints.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// JSON response envelope: `{ success, data?, error? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDto>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Error details in an API response.
#[derive(Debug, Serialize)]
pub struct ApiErrorDto {
    pub code: String,
    pub message: String,
}

/// Request body for `POST /evaluate`.
///
/// `event_id` is optional; when absent the server assigns a UUID v4 before
/// evaluation, so every `MatchResultDto` in a response carries a concrete id.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub event_id: Option<String>,
    pub event_type: String,
    #[serde(deserialize_with = "deserialize_ordered_attributes")]
    pub attributes: Vec<(String, serde_json::Value)>,
}

/// Deserializes the `attributes` object preserving every `(key, value)`
/// pair in source order, duplicates included. A plain `HashMap` target
/// would silently keep only the last occurrence of a repeated key; here
/// the duplicate survives to reach `RuleEvaluator::evaluate`, which is what
/// lets it be rejected as `InvalidEvent` instead of silently accepted.
fn deserialize_ordered_attributes<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, serde_json::Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedAttributesVisitor;

    impl<'de> Visitor<'de> for OrderedAttributesVisitor {
        type Value = Vec<(String, serde_json::Value)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object mapping attribute names to values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(OrderedAttributesVisitor)
}

/// Response body for a successful `POST /evaluate`.
#[derive(Debug, Serialize)]
pub struct MatchResultDto {
    pub event_id: String,
    pub matched_rule_codes: Vec<String>,
    pub predicates_evaluated: u64,
}

/// Health check response (liveness — always 200 when the process is up).
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Readiness response (200 iff a model has been published).
#[derive(Debug, Serialize)]
pub struct ReadyDto {
    pub ready: bool,
}
