//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. This keeps the fallback and merge logic
//! decoupled from any particular LLM vendor.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::AgentError;

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer for a specific provider
/// while presenting a uniform interface to the orchestrator. They must not
/// retry internally; model fallback is the orchestrator's job.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"groq"`, `"google"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures (transport, auth, rate limit).
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;

    /// Lists model identifiers available to this credential.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Unsupported`] unless overridden.
    async fn list_models(&self) -> Result<Vec<String>, AgentError> {
        Err(AgentError::Unsupported {
            provider: self.name().to_string(),
        })
    }
}
