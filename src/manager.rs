//! Owns the live, hot-swappable `EngineModel`.
//!
//! `RuleEvaluator::evaluate` loads the model reference exactly once per
//! call via [`ModelManager::load`]; a `publish` racing with in-flight
//! evaluations never tears a single evaluation's view of the model, since
//! each evaluation holds its own `Arc` for its whole duration.

use crate::model::EngineModel;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

#[derive(Default)]
pub struct ModelManager {
    current: ArcSwapOption<EngineModel>,
}

impl ModelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: EngineModel) -> Self {
        let manager = Self::new();
        manager.publish(model);
        manager
    }

    /// Atomically swap in a new model. Previously loaded `Arc<EngineModel>`
    /// handles held by in-flight evaluations remain valid until dropped.
    pub fn publish(&self, model: EngineModel) {
        self.current.store(Some(Arc::new(model)));
    }

    /// The currently published model, if any.
    pub fn load(&self) -> Option<Arc<EngineModel>> {
        self.current.load_full()
    }

    /// Whether a model has been published at all. Does not require the
    /// model to contain any rules — an intentionally empty rulebase is
    /// still a "ready" model per the readiness contract.
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }
}
