//! REST API Handlers
//!
//! Contains the HTTP endpoint handlers: evaluation and admin (health/ready/metrics).

pub mod admin;
pub mod evaluate;
