//! HTTP front end for fanout-rs.
//!
//! Exposes the search agent over a small JSON API plus a dashboard page.
//!
//! # Feature Gate
//!
//! This module requires the `server` feature flag (on by default):
//! ```toml
//! [dependencies]
//! fanout-rs = { version = "...", features = ["server"] }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET  /         dashboard page
//! POST /setup    add API keys, swap in a new agent
//! POST /search   run the pipeline for one query
//! GET  /health   readiness check
//! ```
//!
//! The JSON routes are also mounted under `/api`.

pub mod dashboard;
pub mod routes;
pub mod state;
pub mod transport;

pub use routes::router;
pub use state::{AgentFactory, AppState};
pub use transport::serve;
