//! Request and response types shared by every completion provider.
//!
//! A query is sent as one user turn carrying the grounded prompt; the
//! provider adapter turns it into whatever its SDK expects.

use serde::{Deserialize, Serialize};

/// One completion call against one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier (e.g., "llama-3.3-70b-versatile").
    pub model: String,
    /// Full prompt, context included.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Completion token cap.
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a request with no sampling overrides.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets temperature and token cap.
    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub prompt_tokens: u32,
    /// Completion tokens.
    pub completion_tokens: u32,
    /// Sum of both.
    pub total_tokens: u32,
}

/// What a model sent back.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Generated text; `None` when the upstream returned no choices.
    pub content: Option<String>,
    /// Token usage.
    pub usage: TokenUsage,
    /// Finish reason (e.g., `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Returns the content when it is present and not blank.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new("gemini-2.0-flash", "What is ML?").with_sampling(0.7, 1024);
        assert_eq!(request.model, "gemini-2.0-flash");
        assert_eq!(request.prompt, "What is ML?");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1024));
    }

    #[test]
    fn test_response_text_filters_blank() {
        let mut response = ChatResponse {
            content: Some("  \n".to_string()),
            ..ChatResponse::default()
        };
        assert!(response.text().is_none());

        response.content = None;
        assert!(response.text().is_none());

        response.content = Some("ML is...".to_string());
        assert_eq!(response.text(), Some("ML is..."));
    }
}
