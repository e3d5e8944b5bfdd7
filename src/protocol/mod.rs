//! Helios HTTP Protocol
//!
//! The external-collaborator shape around the evaluation core: a thin
//! `axum` wrapper exposing `POST /evaluate`, `GET /health`, `GET /ready`,
//! and `GET /metrics`.
//!
//! # Module Structure
//!
//! - `rest` — router construction, middleware, and the `/evaluate` handler

pub mod rest;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Maximum request body size (1 MB): an evaluate request is one event, not
/// a bulk upload.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
