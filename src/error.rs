//! Error taxonomy for the evaluation engine.
//!
//! `EngineError` covers everything that can go wrong while evaluating an
//! event against a published model. `CompileError` is a separate, smaller
//! type for the rule-source compiler — it never appears in the hot path.

use thiserror::Error;

/// Errors that `RuleEvaluator::evaluate` can return.
///
/// `ModelInvariantViolated` indicates a corrupted or inconsistent compiled
/// model (e.g. a posting list referencing a rule id past the counter
/// array's bound) and should be treated as fatal by callers: the process
/// should alert and likely restart rather than keep serving from the model.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The event failed validation before evaluation began.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// No model has been published to the manager yet.
    #[error("model not loaded")]
    ModelNotLoaded,

    /// The compiled model violated an internal invariant during evaluation.
    #[error("model invariant violated (fingerprint {fingerprint:016x}): {detail}")]
    ModelInvariantViolated { fingerprint: u64, detail: String },

    /// A metrics sink failed to record a measurement. Never fatal: callers
    /// log and continue, evaluation correctness does not depend on metrics.
    #[error("metrics sink failure: {0}")]
    MetricsSinkFailure(String),

    /// The context pool already holds `max_contexts` distinct executor
    /// contexts and this calling thread is not one of them.
    #[error("context pool exhausted: already holding {max_contexts} contexts")]
    PoolExhausted { max_contexts: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while compiling a rule source into an `EngineModel`.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("line {line}: invalid JSON: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: unsupported operator {operator:?} (only EQUAL_TO is implemented)")]
    UnsupportedOperator { line: usize, operator: String },

    #[error("line {line}: rule has no conditions")]
    EmptyRule { line: usize },

    #[error("line {line}: duplicate condition on field {field:?} within one rule")]
    DuplicateCondition { line: usize, field: String },

    #[error("rule code {rule_code:?} used on non-contiguous lines; all conditions for a rule must be grouped")]
    NonContiguousRule { rule_code: String },

    #[error("line {line}: field {field:?} has an operand value that is not a string, integer, float, or bool")]
    InvalidOperandValue { line: usize, field: String },
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_event_display() {
        let err = EngineError::InvalidEvent("duplicate attribute user_id".to_string());
        assert_eq!(err.to_string(), "invalid event: duplicate attribute user_id");
    }

    #[test]
    fn model_not_loaded_display() {
        assert_eq!(EngineError::ModelNotLoaded.to_string(), "model not loaded");
    }

    #[test]
    fn model_invariant_violated_includes_fingerprint_hex() {
        let err = EngineError::ModelInvariantViolated {
            fingerprint: 0xdead_beef,
            detail: "counter array too small".to_string(),
        };
        assert!(err.to_string().contains("00000000deadbeef"));
    }

    #[test]
    fn pool_exhausted_display() {
        let err = EngineError::PoolExhausted { max_contexts: 4 };
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn unsupported_operator_display() {
        let err = CompileError::UnsupportedOperator {
            line: 3,
            operator: "GREATER_THAN".to_string(),
        };
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("GREATER_THAN"));
    }
}
