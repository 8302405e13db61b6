//! Multi-provider completion with per-provider model fallback.
//!
//! Each active provider walks its ordered model list and stops at the
//! first non-empty answer. Providers run concurrently and never affect
//! one another; their outcomes merge into an [`AnswerMap`] in fixed
//! provider order.
//!
//! ```text
//! prompt ─┬─ groq:   model[0] ✗ → model[1] ✓ ─→ Answered
//!         └─ google: model[0] ✗ (exhausted)  ─→ Unavailable
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::answer::{AnswerMap, ProviderAnswer};
use super::client::create_provider;
use super::config::AgentConfig;
use super::credentials::{CredentialStore, ProviderId};
use super::message::ChatRequest;
use super::prompt::build_prompt;
use super::provider::LlmProvider;
use crate::error::AgentError;

/// One provider's client and its ordered fallback list.
#[derive(Clone)]
pub struct ProviderSlot {
    /// Provider identity.
    pub id: ProviderId,
    /// Client; `None` when construction failed.
    pub provider: Option<Arc<dyn LlmProvider>>,
    /// Models tried in order.
    pub models: Vec<String>,
}

impl ProviderSlot {
    /// Creates a slot with a ready client.
    pub fn new<I, S>(id: ProviderId, provider: Arc<dyn LlmProvider>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            provider: Some(provider),
            models: models.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Debug for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSlot")
            .field("id", &self.id)
            .field("initialized", &self.provider.is_some())
            .field("models", &self.models)
            .finish()
    }
}

/// Why a single model attempt produced no answer.
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error("client not initialized")]
    NotInitialized,
    #[error(transparent)]
    Call(#[from] AgentError),
}

impl AttemptFailure {
    const fn class(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::Call(AgentError::Timeout { .. }) => "timeout",
            Self::Call(AgentError::EmptyResponse { .. }) => "empty_response",
            Self::Call(_) => "transport",
        }
    }
}

/// Fans a prompt out to every active provider.
#[derive(Debug, Clone)]
pub struct CompletionOrchestrator {
    slots: Vec<ProviderSlot>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl CompletionOrchestrator {
    /// Creates an orchestrator over explicit provider slots.
    ///
    /// Slots are kept in provider order regardless of input order.
    #[must_use]
    pub fn new(mut slots: Vec<ProviderSlot>, config: &AgentConfig) -> Self {
        slots.sort_by_key(|s| s.id);
        slots.dedup_by_key(|s| s.id);
        Self {
            slots,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }

    /// Builds one slot per active provider in the credential store.
    ///
    /// A provider whose client cannot be built keeps its slot with no
    /// client, so every attempt fails as not initialized and the provider
    /// reports [`ProviderAnswer::Unavailable`].
    #[must_use]
    pub fn from_credentials(credentials: &CredentialStore, config: &AgentConfig) -> Self {
        let slots = credentials
            .active_providers()
            .into_iter()
            .map(|id| {
                let provider = credentials
                    .secret(id)
                    .map(|secret| create_provider(id, secret, config))
                    .transpose()
                    .unwrap_or_else(|e| {
                        warn!(provider = %id, error = %e, "provider client init failed");
                        None
                    });
                ProviderSlot {
                    id,
                    provider,
                    models: config.models_for(id).to_vec(),
                }
            })
            .collect();
        Self::new(slots, config)
    }

    /// Returns `true` when at least one provider slot exists.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Provider slots in invocation order.
    #[must_use]
    pub fn slots(&self) -> &[ProviderSlot] {
        &self.slots
    }

    /// Generates one answer per active provider.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoProviderConfigured`] when there are no
    /// provider slots. Per-provider failures never surface as errors;
    /// they become [`ProviderAnswer::Unavailable`].
    pub async fn complete(&self, query: &str, context: &str) -> Result<AnswerMap, AgentError> {
        if self.slots.is_empty() {
            return Err(AgentError::NoProviderConfigured);
        }

        let prompt = build_prompt(query, context);
        let prompt = prompt.as_str();
        let futures = self
            .slots
            .iter()
            .map(|slot| async move { (slot.id, self.answer_with_fallback(slot, prompt).await) });
        let answers: AnswerMap = join_all(futures).await.into_iter().collect();

        info!(
            providers = answers.len(),
            answered = answers.answered_count(),
            "completion finished"
        );
        Ok(answers)
    }

    /// Walks the slot's model list until one model answers.
    async fn answer_with_fallback(&self, slot: &ProviderSlot, prompt: &str) -> ProviderAnswer {
        for model in &slot.models {
            debug!(provider = %slot.id, model = %model, "attempting model");
            match self.attempt(slot, model, prompt).await {
                Ok(text) => {
                    debug!(
                        provider = %slot.id,
                        model = %model,
                        chars = text.len(),
                        "model answered"
                    );
                    return ProviderAnswer::Answered(text);
                }
                Err(failure) => {
                    warn!(
                        provider = %slot.id,
                        model = %model,
                        class = failure.class(),
                        error = %failure,
                        "model attempt failed"
                    );
                }
            }
        }

        warn!(
            provider = %slot.id,
            models = slot.models.len(),
            "all models failed; provider unavailable"
        );
        ProviderAnswer::Unavailable
    }

    async fn attempt(
        &self,
        slot: &ProviderSlot,
        model: &str,
        prompt: &str,
    ) -> Result<String, AttemptFailure> {
        let provider = slot
            .provider
            .as_ref()
            .ok_or(AttemptFailure::NotInitialized)?;

        let request =
            ChatRequest::new(model, prompt).with_sampling(self.temperature, self.max_tokens);

        let response = tokio::time::timeout(self.timeout, provider.chat(&request))
            .await
            .map_err(|_| AgentError::Timeout {
                model: model.to_string(),
                secs: self.timeout.as_secs(),
            })??;
        debug!(
            model,
            tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "completion received"
        );

        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| {
                AgentError::EmptyResponse {
                    model: model.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{ChatResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers per model: `Some(text)` succeeds, `None` fails.
    struct Scripted {
        script: Vec<(&'static str, Option<&'static str>)>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(script: Vec<(&'static str, Option<&'static str>)>) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(request.model.clone());
            }
            let entry = self.script.iter().find(|(m, _)| *m == request.model);
            match entry {
                Some((_, Some(text))) => Ok(ChatResponse {
                    content: Some((*text).to_string()),
                    usage: TokenUsage::default(),
                    finish_reason: Some("stop".to_string()),
                }),
                Some((_, None)) | None => Err(AgentError::ApiRequest {
                    message: "rate limited".to_string(),
                    status: Some(429),
                }),
            }
        }
    }

    struct Blank;

    #[async_trait]
    impl LlmProvider for Blank {
        fn name(&self) -> &'static str {
            "blank"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            Ok(ChatResponse {
                content: None,
                usage: TokenUsage::default(),
                finish_reason: None,
            })
        }
    }

    struct Slow;

    #[async_trait]
    impl LlmProvider for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ChatResponse {
                content: Some("late".to_string()),
                usage: TokenUsage::default(),
                finish_reason: None,
            })
        }
    }

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn test_no_slots_is_error() {
        let orchestrator = CompletionOrchestrator::new(Vec::new(), &config());
        assert!(!orchestrator.is_ready());
        let result = orchestrator.complete("q", "").await;
        assert!(matches!(result, Err(AgentError::NoProviderConfigured)));
    }

    #[tokio::test]
    async fn test_fallback_to_second_model() {
        let groq = Scripted::new(vec![("m1", None), ("m2", Some("from m2"))]);
        let slot = ProviderSlot::new(ProviderId::Groq, groq.clone(), ["m1", "m2"]);
        let orchestrator = CompletionOrchestrator::new(vec![slot], &config());

        let answers = orchestrator
            .complete("q", "")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            answers.get(ProviderId::Groq),
            &ProviderAnswer::Answered("from m2".to_string())
        );
        assert_eq!(groq.calls(), vec!["m1".to_string(), "m2".to_string()]);
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let groq = Scripted::new(vec![("m1", Some("first")), ("m2", Some("second"))]);
        let slot = ProviderSlot::new(ProviderId::Groq, groq.clone(), ["m1", "m2"]);
        let orchestrator = CompletionOrchestrator::new(vec![slot], &config());

        let answers = orchestrator
            .complete("q", "ctx")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(answers.get(ProviderId::Groq).text(), Some("first"));
        assert_eq!(groq.calls(), vec!["m1".to_string()]);
    }

    #[tokio::test]
    async fn test_exhaustion_isolated_per_provider() {
        let groq = Scripted::new(vec![("m1", None), ("m2", None)]);
        let google = Scripted::new(vec![("g1", Some("gemini says"))]);
        let slots = vec![
            ProviderSlot::new(ProviderId::Google, google, ["g1"]),
            ProviderSlot::new(ProviderId::Groq, groq, ["m1", "m2"]),
        ];
        let orchestrator = CompletionOrchestrator::new(slots, &config());

        let answers = orchestrator
            .complete("q", "")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(answers.get(ProviderId::Groq), &ProviderAnswer::Unavailable);
        assert_eq!(answers.get(ProviderId::Google).text(), Some("gemini says"));
        let order: Vec<ProviderId> = answers.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![ProviderId::Groq, ProviderId::Google]);
    }

    #[tokio::test]
    async fn test_empty_response_falls_through() {
        let slot = ProviderSlot::new(ProviderId::Google, Arc::new(Blank), ["g1", "g2"]);
        let orchestrator = CompletionOrchestrator::new(vec![slot], &config());
        let answers = orchestrator
            .complete("q", "")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(answers.get(ProviderId::Google), &ProviderAnswer::Unavailable);
        assert_eq!(answers.get(ProviderId::Groq), &ProviderAnswer::NotConfigured);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let slot = ProviderSlot::new(ProviderId::Groq, Arc::new(Slow), ["slow"]);
        let orchestrator = CompletionOrchestrator::new(vec![slot], &config());
        let answers = orchestrator
            .complete("q", "")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(answers.get(ProviderId::Groq), &ProviderAnswer::Unavailable);
    }

    #[tokio::test]
    async fn test_attempt_failures_carry_model() {
        let orchestrator = CompletionOrchestrator::new(Vec::new(), &config());

        let blank = ProviderSlot::new(ProviderId::Google, Arc::new(Blank), ["g1"]);
        let Err(failure) = orchestrator.attempt(&blank, "g1", "q").await else {
            unreachable!()
        };
        assert_eq!(failure.class(), "empty_response");
        assert!(matches!(
            &failure,
            AttemptFailure::Call(AgentError::EmptyResponse { model }) if model == "g1"
        ));

        let slow = ProviderSlot::new(ProviderId::Groq, Arc::new(Slow), ["slow"]);
        let Err(failure) = orchestrator.attempt(&slow, "slow", "q").await else {
            unreachable!()
        };
        assert_eq!(failure.class(), "timeout");
        assert!(matches!(
            &failure,
            AttemptFailure::Call(AgentError::Timeout { model, secs: 0 }) if model == "slow"
        ));
        assert_eq!(
            failure.to_string(),
            "request to model 'slow' timed out after 0s"
        );

        let scripted = Scripted::new(vec![("m1", None)]);
        let slot = ProviderSlot::new(ProviderId::Groq, scripted, ["m1"]);
        let Err(failure) = orchestrator.attempt(&slot, "m1", "q").await else {
            unreachable!()
        };
        assert_eq!(failure.class(), "transport");
    }

    #[tokio::test]
    async fn test_uninitialized_slot_is_unavailable() {
        let slot = ProviderSlot {
            id: ProviderId::Groq,
            provider: None,
            models: vec!["m1".to_string()],
        };
        let orchestrator = CompletionOrchestrator::new(vec![slot], &config());
        assert!(orchestrator.is_ready());
        let answers = orchestrator
            .complete("q", "")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(answers.get(ProviderId::Groq), &ProviderAnswer::Unavailable);
    }

    #[test]
    fn test_from_credentials_follows_active_set() {
        let store = CredentialStore::new().with_keys(None, Some("AIza"));
        let orchestrator = CompletionOrchestrator::from_credentials(&store, &config());
        let ids: Vec<ProviderId> = orchestrator.slots().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![ProviderId::Google]);
        assert_eq!(orchestrator.slots()[0].models, vec!["gemini-2.0-flash"]);
        assert!(orchestrator.slots()[0].provider.is_some());
    }
}
