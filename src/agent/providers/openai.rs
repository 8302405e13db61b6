//! OpenAI-compatible provider implementation using the `async-openai` crate.
//!
//! Both Groq and Gemini expose OpenAI-compatible chat endpoints, so one
//! implementation serves every [`ProviderId`]; only the base URL and the
//! credential differ.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

use crate::agent::credentials::ProviderId;
use crate::agent::message::{ChatRequest, ChatResponse, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::error::AgentError;

/// OpenAI-compatible LLM provider.
pub struct OpenAiProvider {
    id: ProviderId,
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    /// Creates a provider for `id` against `base_url` with the given key.
    ///
    /// The SDK's own rate-limit backoff is switched off: a 429 fails the
    /// call at once so the next model in the fallback list gets its turn.
    #[must_use]
    pub fn new(id: ProviderId, api_key: &str, base_url: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url.trim_end_matches('/'));
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            id,
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }

    /// Maps a request onto the SDK's chat completion type.
    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let user = ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
            name: None,
        };
        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![ChatCompletionRequestMessage::User(user)],
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            ..Default::default()
        }
    }

    fn map_error(e: &OpenAIError) -> AgentError {
        let status = match e {
            OpenAIError::Reqwest(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        };
        AgentError::ApiRequest {
            message: e.to_string(),
            status,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("id", &self.id)
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.id.as_str()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        let openai_request = Self::build_request(request);

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| Self::map_error(&e))?;

        let choice = response.choices.first();

        let content = choice.and_then(|c| c.message.content.clone());

        let finish_reason = choice.and_then(|c| {
            c.finish_reason
                .as_ref()
                .map(|fr| format!("{fr:?}").to_lowercase())
        });

        let usage = response
            .usage
            .map_or_else(TokenUsage::default, |u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });

        Ok(ChatResponse {
            content,
            usage,
            finish_reason,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, AgentError> {
        let response = self
            .client
            .models()
            .list()
            .await
            .map_err(|e| Self::map_error(&e))?;
        let mut ids: Vec<String> = response.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }
}
