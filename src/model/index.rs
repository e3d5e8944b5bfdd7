//! Maps `(field, value)` pairs to the predicates that test them, and each
//! predicate to the posting list of rules that require it.
//!
//! Field dispatch is a dense `Vec` indexed by `FieldId` — field ids are
//! assigned at compile time and are always contiguous, so a hash lookup at
//! this layer would be pure overhead. Value dispatch within a field is
//! necessarily a `HashMap`, since values come from arbitrary event data.

use super::{FieldId, PredicateId, RuleId};
use crate::value::Scalar;
use std::collections::HashMap;

type ValueMap = HashMap<Scalar, Vec<PredicateId>>;

/// The compiled lookup structure described in the predicate index component:
/// event attribute → candidate predicate ids, and predicate id → the rules
/// it participates in.
#[derive(Debug, Default)]
pub struct PredicateIndex {
    by_field: Vec<Option<ValueMap>>,
    postings: Vec<Vec<RuleId>>,
}

impl PredicateIndex {
    pub(crate) fn with_capacity(num_fields: usize, num_predicates: usize) -> Self {
        let mut by_field = Vec::with_capacity(num_fields);
        by_field.resize_with(num_fields, || None);
        Self {
            by_field,
            postings: Vec::with_capacity(num_predicates),
        }
    }

    pub(crate) fn insert_predicate(&mut self, field: FieldId, value: Scalar, predicate: PredicateId) {
        let slot = &mut self.by_field[field.0 as usize];
        let map = slot.get_or_insert_with(HashMap::new);
        map.entry(value).or_default().push(predicate);
        if self.postings.len() <= predicate.0 as usize {
            self.postings.resize(predicate.0 as usize + 1, Vec::new());
        }
    }

    pub(crate) fn push_posting(&mut self, predicate: PredicateId, rule: RuleId) {
        self.postings[predicate.0 as usize].push(rule);
    }

    /// Look up the predicates (if any) that test `field` for equality with
    /// `value`. Returns an empty slice if no rule in the model cares about
    /// this exact `(field, value)` pair — the common case for most event
    /// fields. A non-empty result usually has exactly one predicate today
    /// (predicates are deduplicated by the builder), but the slice shape
    /// holds without restructuring once operators beyond `EqualTo` can map
    /// distinct predicates onto the same `(field, value)` pair.
    pub fn lookup(&self, field: FieldId, value: &Scalar) -> &[PredicateId] {
        self.by_field
            .get(field.0 as usize)
            .and_then(|slot| slot.as_ref())
            .and_then(|map| map.get(value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The rules that require `predicate` to be true. Exact inverse of each
    /// `Rule::predicate_ids` — every rule id here has `predicate` in its
    /// predicate list, and no rule containing `predicate` is missing.
    pub fn rules_for(&self, predicate: PredicateId) -> &[RuleId] {
        self.postings
            .get(predicate.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
