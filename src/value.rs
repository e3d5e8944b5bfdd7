//! Typed scalar values used as predicate operands and event attribute values.
//!
//! # Example
//!
//! ```
//! use helios::value::Scalar;
//!
//! let a = Scalar::from("checkout");
//! let b = Scalar::Int64(42);
//! assert_ne!(a, b);
//! assert_eq!(Scalar::from("checkout"), Scalar::from("checkout"));
//! ```

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A typed scalar value: the four operand kinds the spec admits.
///
/// `Float64` hashes and compares by IEEE bit pattern (`to_bits`) rather than
/// numeric equality, which is what lets `Scalar` serve as a `HashMap` key in
/// the predicate index's per-field value maps — plain `f64` is not `Eq`
/// because `NaN != NaN`, but two equal-bits floats are always the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    String(Arc<str>),
    Int64(i64),
    Float64(f64),
    Bool(bool),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::String(_) => ScalarKind::String,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::Float64(_) => ScalarKind::Float64,
            Scalar::Bool(_) => ScalarKind::Bool,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(Arc::from(s))
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(Arc::from(s.as_str()))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Int64(a), Scalar::Int64(b)) => a == b,
            (Scalar::Float64(a), Scalar::Float64(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::String(s) => s.hash(state),
            Scalar::Int64(v) => v.hash(state),
            Scalar::Float64(v) => v.to_bits().hash(state),
            Scalar::Bool(v) => v.hash(state),
        }
    }
}

/// The type tag of a `Scalar`, used to validate event attribute values
/// against the operand type recorded for a field at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int64,
    Float64,
    Bool,
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScalarKind::String => "string",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float64 => "float64",
            ScalarKind::Bool => "bool",
        };
        f.write_str(s)
    }
}
