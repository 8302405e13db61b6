//! # fanout-rs
//!
//! Query fan-out and answer aggregation.
//!
//! A question is grounded in documents from two sources (arXiv papers and
//! Wikipedia articles), formatted into one context block, and sent to
//! every configured LLM provider (Groq, Google Gemini). Each provider
//! falls back across its own ordered model list; the answers come back
//! as one [`AnswerMap`](agent::AnswerMap) where every provider is
//! answered, unavailable, or not configured.
//!
//! ## Layout
//!
//! - [`core`]: documents and text helpers
//! - [`retrieval`]: search backends with per-source failure isolation
//! - [`agent`]: credentials, providers, fallback, and the [`SearchAgent`](agent::SearchAgent) facade
//! - [`cli`]: command-line front end and interactive loop
//! - `server`: HTTP API and dashboard (feature `server`)

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;
pub mod retrieval;
#[cfg(feature = "server")]
pub mod server;

pub use agent::{
    AgentConfig, AnswerMap, CredentialStore, ProviderAnswer, ProviderId, QueryResult, SearchAgent,
};
pub use error::{AgentError, CommandError, Error, Result, RetrievalError};
