//! The per-evaluation scratchpad: which predicates are true, which rules
//! have been touched, and each touched rule's running counter.
//!
//! A context is sized from the model it was last used against and grown
//! (never shrunk) as needed, so the same context can be reused across a
//! model hot-swap that adds rules without a fresh allocation on the next
//! `evaluate` call.

use crate::bitset::BitSet;
use crate::model::{PredicateId, RuleId};

#[derive(Debug, Default)]
pub struct EvaluationContext {
    true_predicates: BitSet,
    /// Guards `touched_rules` against duplicate pushes in O(1), replacing
    /// the linear scan the original design used.
    seen_rules: BitSet,
    touched_rules: Vec<RuleId>,
    counters: Vec<u32>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow internal storage to fit a model with `num_predicates` predicates
    /// and `num_rules` rules. Idempotent and cheap once already large enough.
    pub fn ensure_capacity(&mut self, num_predicates: usize, num_rules: usize) {
        self.true_predicates.ensure_len(num_predicates);
        self.seen_rules.ensure_len(num_rules);
        if self.counters.len() < num_rules {
            self.counters.resize(num_rules, 0);
        }
    }

    /// Reset to a clean state for the next evaluation. Only the rules and
    /// predicates touched during the previous evaluation are cleared, which
    /// is O(touched) rather than O(model size) — the whole point of tracking
    /// `touched_rules` at all.
    pub fn reset(&mut self) {
        for &rule in &self.touched_rules {
            self.counters[rule.0 as usize] = 0;
        }
        self.seen_rules.clear_indices(self.touched_rules.iter().map(|r| r.0 as usize));
        self.touched_rules.clear();
        self.true_predicates.clear();
    }

    pub fn mark_predicate_true(&mut self, predicate: PredicateId) {
        self.true_predicates.set(predicate.0 as usize);
    }

    pub fn is_predicate_true(&self, predicate: PredicateId) -> bool {
        self.true_predicates.get(predicate.0 as usize)
    }

    /// Record that `rule` now has one more satisfied predicate. Adds `rule`
    /// to the touched list exactly once, on its first activation.
    pub fn increment_rule(&mut self, rule: RuleId) -> u32 {
        if !self.seen_rules.get(rule.0 as usize) {
            self.seen_rules.set(rule.0 as usize);
            self.touched_rules.push(rule);
        }
        let counter = &mut self.counters[rule.0 as usize];
        *counter += 1;
        *counter
    }

    pub fn touched_rules(&self) -> &[RuleId] {
        &self.touched_rules
    }

    pub fn counter(&self, rule: RuleId) -> u32 {
        self.counters[rule.0 as usize]
    }
}
