//! Agent facade for the retrieve-then-generate pipeline.
//!
//! Coordinates the full query pipeline: retrieval from both sources →
//! context formatting → concurrent completion across providers → result
//! envelope.

use std::time::Instant;

use tracing::{info, warn};

use super::completion::CompletionOrchestrator;
use super::config::AgentConfig;
use super::credentials::{CredentialStore, ProviderId};
use super::prompt::format_context;
use super::result::QueryResult;
use crate::error::AgentError;
use crate::retrieval::{RetrievalClient, SourceLimits};

/// Longest accepted query, in bytes.
pub const MAX_QUERY_LEN: usize = 10_000;

/// Answers questions from retrieved evidence using every active provider.
///
/// Holds only immutable state, so one agent can serve concurrent queries
/// behind an `Arc` without locking. Reconfiguring means building a new
/// agent.
#[derive(Debug, Clone)]
pub struct SearchAgent {
    credentials: CredentialStore,
    config: AgentConfig,
    retrieval: RetrievalClient,
    completion: CompletionOrchestrator,
}

impl SearchAgent {
    /// Creates an agent from explicit parts.
    ///
    /// `credentials` decides readiness; `completion` should have been
    /// built from the same store.
    #[must_use]
    pub const fn new(
        credentials: CredentialStore,
        config: AgentConfig,
        retrieval: RetrievalClient,
        completion: CompletionOrchestrator,
    ) -> Self {
        Self {
            credentials,
            config,
            retrieval,
            completion,
        }
    }

    /// Creates an agent over the real search backends and providers.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the search backends cannot
    /// be built.
    pub fn from_credentials(
        credentials: CredentialStore,
        config: AgentConfig,
    ) -> crate::Result<Self> {
        let retrieval = RetrievalClient::from_config(&config)?;
        let completion = CompletionOrchestrator::from_credentials(&credentials, &config);
        Ok(Self::new(credentials, config, retrieval, completion))
    }

    /// Returns `true` when at least one provider is configured.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.credentials.is_usable()
    }

    /// Providers that will be queried, in invocation order.
    #[must_use]
    pub fn active_providers(&self) -> Vec<ProviderId> {
        self.credentials.active_providers()
    }

    /// The credential snapshot this agent was built with.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Agent configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs the pipeline with the configured per-source limits.
    ///
    /// # Errors
    ///
    /// See [`SearchAgent::search_with_limits`].
    pub async fn search_and_answer(&self, query: &str) -> Result<QueryResult, AgentError> {
        let limits = SourceLimits {
            paper: self.config.paper_limit,
            article: self.config.article_limit,
        };
        self.search_with_limits(query, limits).await
    }

    /// Runs the pipeline with explicit per-source limits.
    ///
    /// A limit of 0 skips that source.
    ///
    /// # Errors
    ///
    /// - [`AgentError::InvalidQuery`] for a blank or oversized query.
    /// - [`AgentError::NoProviderConfigured`] when no provider is active;
    ///   this is checked before any network call.
    ///
    /// Retrieval and per-provider failures are absorbed into the result.
    pub async fn search_with_limits(
        &self,
        query: &str,
        limits: SourceLimits,
    ) -> Result<QueryResult, AgentError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::InvalidQuery {
                message: "query cannot be empty".to_string(),
            });
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(AgentError::InvalidQuery {
                message: format!(
                    "query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                    query.len()
                ),
            });
        }
        if !self.is_ready() {
            return Err(AgentError::NoProviderConfigured);
        }

        let start = Instant::now();

        let retrieval = self.retrieval.retrieve(query, limits).await;
        info!(
            papers = retrieval.paper_count(),
            articles = retrieval.article_count(),
            "retrieval finished"
        );

        let context = format_context(&retrieval);
        if context.is_empty() {
            warn!("no documents found; generating without context");
        }

        let answers = self.completion.complete(query, &context).await?;

        Ok(QueryResult {
            query: query.to_string(),
            retrieval,
            answers,
            context,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::answer::ProviderAnswer;
    use crate::agent::completion::ProviderSlot;
    use crate::agent::message::{ChatRequest, ChatResponse, TokenUsage};
    use crate::agent::provider::LlmProvider;
    use crate::core::RawHit;
    use crate::error::RetrievalError;
    use crate::retrieval::SearchBackend;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<RawHit>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RawHit {
                title: format!("About {query}"),
                body: "body".to_string(),
                url: "https://example.org".to_string(),
                ..RawHit::default()
            }])
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            Ok(ChatResponse {
                content: Some(request.prompt.clone()),
                usage: TokenUsage::default(),
                finish_reason: None,
            })
        }
    }

    fn agent(credentials: CredentialStore, backend: &Arc<CountingBackend>) -> SearchAgent {
        let config = AgentConfig::default();
        let retrieval = RetrievalClient::new(
            Arc::clone(backend) as Arc<dyn SearchBackend>,
            Arc::clone(backend) as Arc<dyn SearchBackend>,
            Duration::from_secs(1),
        );
        let slots = credentials
            .active_providers()
            .into_iter()
            .map(|id| ProviderSlot::new(id, Arc::new(EchoProvider), ["echo-model"]))
            .collect();
        let completion = CompletionOrchestrator::new(slots, &config);
        SearchAgent::new(credentials, config, retrieval, completion)
    }

    #[tokio::test]
    async fn test_unconfigured_agent_makes_no_calls() {
        let backend = Arc::new(CountingBackend::default());
        let agent = agent(CredentialStore::new(), &backend);
        let result = agent.search_and_answer("What is ML?").await;
        assert!(matches!(result, Err(AgentError::NoProviderConfigured)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let backend = Arc::new(CountingBackend::default());
        let agent = agent(CredentialStore::new().with_keys(Some("k"), None), &backend);
        let result = agent.search_and_answer("   ").await;
        assert!(matches!(result, Err(AgentError::InvalidQuery { .. })));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_context_and_question() {
        let backend = Arc::new(CountingBackend::default());
        let agent = agent(CredentialStore::new().with_keys(Some("k"), None), &backend);
        let result = agent
            .search_and_answer("  rust  ")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(result.query, "rust");
        assert_eq!(result.paper_count(), 1);
        assert_eq!(result.article_count(), 1);
        let answer = result.answers.get(ProviderId::Groq).text().unwrap_or_default();
        assert!(answer.starts_with("## ARXIV PAPERS:"));
        assert!(answer.ends_with("\n\nQuestion: rust"));
        assert_eq!(
            result.answers.get(ProviderId::Google),
            &ProviderAnswer::NotConfigured
        );
    }

    #[tokio::test]
    async fn test_zero_limits_skip_sources() {
        let backend = Arc::new(CountingBackend::default());
        let agent = agent(CredentialStore::new().with_keys(None, Some("k")), &backend);
        let result = agent
            .search_with_limits("rust", SourceLimits { paper: 0, article: 0 })
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(result.context.is_empty());
        assert_eq!(result.answers.get(ProviderId::Google).text(), Some("rust"));
    }

    #[test]
    fn test_oversized_query_rejected() {
        let backend = Arc::new(CountingBackend::default());
        let agent = agent(CredentialStore::new().with_keys(Some("k"), None), &backend);
        let query = "x".repeat(MAX_QUERY_LEN + 1);
        let result = futures_util::FutureExt::now_or_never(agent.search_and_answer(&query));
        assert!(matches!(result, Some(Err(AgentError::InvalidQuery { .. }))));
    }
}
