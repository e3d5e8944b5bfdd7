//! The event type evaluated against a compiled model.

use crate::value::Scalar;

/// One event to evaluate. `attributes` is an ordered list rather than a
/// map so that a duplicate field name survives long enough for the
/// evaluator to reject it as `InvalidEvent` — collapsing duplicates into a
/// map at construction time would silently keep only the last value.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub event_id: String,
    pub event_type: String,
    pub attributes: Vec<(String, Scalar)>,
}

impl Event {
    pub fn new(event_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.push((field.into(), value.into()));
        self
    }
}
