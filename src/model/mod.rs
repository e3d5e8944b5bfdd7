//! The compiled rule model: predicates, rules, and the index that maps
//! predicate activations to the rules that require them.
//!
//! An `EngineModel` is immutable once built. There is no public mutator —
//! the only ways to produce one are [`EngineModelBuilder`] (used directly by
//! tests and embedders) and [`crate::compiler::compile`] (parses the
//! rule-source format).

mod builder;
mod index;

pub use builder::EngineModelBuilder;
pub use index::PredicateIndex;

use crate::value::{Scalar, ScalarKind};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Dense identifier for a predicate within one `EngineModel`. Stable only
/// for the lifetime of that model — ids are reassigned on every compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateId(pub u32);

/// Dense identifier for a rule within one `EngineModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub u32);

/// Dense identifier for an event attribute field within one `EngineModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub u32);

/// Comparison operators a predicate can use. Only `EqualTo` is implemented;
/// the enum is `#[non_exhaustive]` so downstream matches are forced to
/// acknowledge that more will be admitted without this being a breaking
/// change when they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operator {
    EqualTo,
}

/// A single atomic condition: `field <op> value`.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub id: PredicateId,
    pub field: FieldId,
    pub field_name: Arc<str>,
    pub operator: Operator,
    pub value: Scalar,
}

/// A conjunctive rule: matches iff every one of `predicate_ids` is true for
/// the event under evaluation. `threshold` is always `predicate_ids.len()`
/// and is cached on the rule so the evaluator never recomputes it.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    pub rule_code: Arc<str>,
    pub predicate_ids: Vec<PredicateId>,
    pub threshold: u32,
}

/// The fully compiled, immutable rule model.
#[derive(Debug)]
pub struct EngineModel {
    pub(crate) field_ids: HashMap<Arc<str>, FieldId>,
    pub(crate) field_names: Vec<Arc<str>>,
    pub(crate) field_kinds: Vec<ScalarKind>,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) index: PredicateIndex,
}

impl EngineModel {
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    pub fn num_predicates(&self) -> usize {
        self.predicates.len()
    }

    pub fn num_fields(&self) -> usize {
        self.field_names.len()
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0 as usize]
    }

    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates[id.0 as usize]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn index(&self) -> &PredicateIndex {
        &self.index
    }

    /// Resolve a field name to its dense id, if the model has ever seen it.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.field_ids.get(name).copied()
    }

    /// The operand type recorded for a field at compile time, used to
    /// validate event attribute values before evaluation.
    pub fn field_kind(&self, field: FieldId) -> ScalarKind {
        self.field_kinds[field.0 as usize]
    }

    pub fn field_name(&self, field: FieldId) -> &str {
        &self.field_names[field.0 as usize]
    }

    /// A stable digest of the compiled model, logged alongside any
    /// `ModelInvariantViolated` error so an on-call engineer can tell which
    /// model version misbehaved.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.predicates.len().hash(&mut hasher);
        self.rules.len().hash(&mut hasher);
        for rule in &self.rules {
            rule.rule_code.hash(&mut hasher);
            rule.predicate_ids.hash(&mut hasher);
        }
        for predicate in &self.predicates {
            predicate.field_name.hash(&mut hasher);
            predicate.value.hash(&mut hasher);
        }
        hasher.finish()
    }
}
