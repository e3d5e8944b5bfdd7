//! # Helios Rule-Matching Engine
//!
//! A high-throughput conjunctive rule-matching engine: a compiled rule
//! model, a predicate index, and a pooled, allocation-free counting matcher.
//!
//! ## Pipeline
//!
//! ```text
//! rule source (JSON lines)
//!     │
//!     ▼
//! [compiler]            → EngineModel (predicates, rules, posting lists)
//!     │
//!     ▼
//! [ModelManager]         → published via ArcSwap, hot-swappable
//!     │
//!     ▼
//! [RuleEvaluator::evaluate]
//!     ├── pooled EvaluationContext (per executor, zero steady-state alloc)
//!     └── MatchResult { matched_rule_codes, predicates_evaluated }
//! ```
//!
//! ## Usage
//!
//! ```
//! use helios::{Event, EngineModelBuilder, ModelManager, MetricsRegistry, RuleEvaluator, Operator};
//! use helios::value::Scalar;
//!
//! let mut builder = EngineModelBuilder::new();
//! builder.add_rule("checkout-us", vec![
//!     ("country", Operator::EqualTo, Scalar::from("US")),
//! ]);
//! let manager = ModelManager::with_model(builder.build());
//! let evaluator = RuleEvaluator::new(manager, MetricsRegistry::noop());
//!
//! let event = Event::new("evt-1", "checkout").with_attribute("country", "US");
//! let result = evaluator.evaluate(&event).unwrap();
//! assert_eq!(result.matched_rule_codes, vec!["checkout-us"]);
//! ```

pub mod bitset;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod evaluator;
pub mod manager;
pub mod metrics;
pub mod model;
pub mod pool;
pub mod protocol;
pub mod value;

pub use config::Config;
pub use error::{CompileError, EngineError, EngineResult};
pub use event::Event;
pub use evaluator::{MatchResult, RuleEvaluator};
pub use manager::ModelManager;
pub use metrics::MetricsRegistry;
pub use model::{EngineModel, EngineModelBuilder, Operator, Predicate, Rule};
