//! Programmatic construction of an `EngineModel`, shared by tests and by
//! [`crate::compiler::compile`].

use super::index::PredicateIndex;
use super::{EngineModel, FieldId, Operator, Predicate, PredicateId, Rule, RuleId};
use crate::value::{Scalar, ScalarKind};
use std::collections::HashMap;
use std::sync::Arc;

/// One condition as supplied to the builder: `(field_name, operator, value)`.
pub type Condition = (&'static str, Operator, Scalar);

#[derive(Default)]
pub struct EngineModelBuilder {
    field_ids: HashMap<Arc<str>, FieldId>,
    field_names: Vec<Arc<str>>,
    field_kinds: Vec<ScalarKind>,
    predicate_ids: HashMap<(FieldId, Operator, Scalar), PredicateId>,
    predicates: Vec<Predicate>,
    rules: Vec<Rule>,
}

impl EngineModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_id(&mut self, name: &str, kind: ScalarKind) -> FieldId {
        if let Some(id) = self.field_ids.get(name) {
            return *id;
        }
        let id = FieldId(self.field_names.len() as u32);
        let name: Arc<str> = Arc::from(name);
        self.field_ids.insert(name.clone(), id);
        self.field_names.push(name);
        self.field_kinds.push(kind);
        id
    }

    fn predicate_id(&mut self, field: FieldId, operator: Operator, value: Scalar) -> PredicateId {
        let key = (field, operator, value.clone());
        if let Some(id) = self.predicate_ids.get(&key) {
            return *id;
        }
        let id = PredicateId(self.predicates.len() as u32);
        self.predicate_ids.insert(key, id);
        self.predicates.push(Predicate {
            id,
            field,
            field_name: self.field_names[field.0 as usize].clone(),
            operator,
            value,
        });
        id
    }

    /// Add one rule (one conjunctive disjunct). `conditions` must be
    /// non-empty and must not repeat a field within the same rule.
    pub fn add_rule<I>(&mut self, rule_code: &str, conditions: I) -> RuleId
    where
        I: IntoIterator<Item = (&'static str, Operator, Scalar)>,
    {
        let mut predicate_ids = Vec::new();
        for (field_name, operator, value) in conditions {
            let field = self.field_id(field_name, value.kind());
            predicate_ids.push(self.predicate_id(field, operator, value));
        }
        let id = RuleId(self.rules.len() as u32);
        let threshold = predicate_ids.len() as u32;
        self.rules.push(Rule {
            id,
            rule_code: Arc::from(rule_code),
            predicate_ids,
            threshold,
        });
        id
    }

    pub fn build(self) -> EngineModel {
        let mut index = PredicateIndex::with_capacity(self.field_names.len(), self.predicates.len());
        for predicate in &self.predicates {
            index.insert_predicate(predicate.field, predicate.value.clone(), predicate.id);
        }
        for rule in &self.rules {
            for &predicate_id in &rule.predicate_ids {
                index.push_posting(predicate_id, rule.id);
            }
        }
        EngineModel {
            field_ids: self.field_ids,
            field_names: self.field_names,
            field_kinds: self.field_kinds,
            predicates: self.predicates,
            rules: self.rules,
            index,
        }
    }
}
