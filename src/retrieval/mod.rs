//! Document retrieval from the paper and article sources.
//!
//! Each source is a [`SearchBackend`]. The [`RetrievalClient`] queries both
//! concurrently and absorbs per-source failures: a source that errors or
//! times out contributes an empty list and never affects the other.
//!
//! ```text
//! query ─┬─ paper backend   (timeout) ─→ Vec<Document> | [] on error
//!        └─ article backend (timeout) ─→ Vec<Document> | [] on error
//!                      ↓
//!               RetrievalResult { papers, articles }
//! ```

pub mod arxiv;
pub mod wikipedia;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agent::config::AgentConfig;
use crate::core::{Document, RawHit, RetrievalResult, SourceKind};
use crate::error::RetrievalError;

pub use arxiv::ArxivBackend;
pub use wikipedia::WikipediaBackend;

/// Trait for external document search services.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logging (e.g., `"arxiv"`).
    fn name(&self) -> &'static str;

    /// Searches for at most `limit` hits.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError`] on transport, status, or parse failures.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>, RetrievalError>;
}

/// Per-source result count limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLimits {
    /// Maximum paper hits (0 skips the paper source).
    pub paper: usize,
    /// Maximum article hits (0 skips the article source).
    pub article: usize,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            paper: crate::agent::config::DEFAULT_PAPER_LIMIT,
            article: crate::agent::config::DEFAULT_ARTICLE_LIMIT,
        }
    }
}

/// Queries both document sources with per-source failure isolation.
#[derive(Clone)]
pub struct RetrievalClient {
    papers: Arc<dyn SearchBackend>,
    articles: Arc<dyn SearchBackend>,
    timeout: Duration,
}

impl RetrievalClient {
    /// Creates a client over the given backends.
    pub fn new(
        papers: Arc<dyn SearchBackend>,
        articles: Arc<dyn SearchBackend>,
        timeout: Duration,
    ) -> Self {
        Self {
            papers,
            articles,
            timeout,
        }
    }

    /// Creates a client over the arXiv and Wikipedia backends.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AgentConfig) -> Result<Self, RetrievalError> {
        let http = http_client(config.search_timeout)?;
        Ok(Self::new(
            Arc::new(ArxivBackend::new(http.clone())),
            Arc::new(WikipediaBackend::new(http)),
            config.search_timeout,
        ))
    }

    /// Retrieves documents from both sources.
    ///
    /// Never fails: a source that errors contributes an empty list. Papers
    /// and articles are placed by source regardless of completion order.
    pub async fn retrieve(&self, query: &str, limits: SourceLimits) -> RetrievalResult {
        let (papers, articles) = tokio::join!(
            self.search_source(&*self.papers, SourceKind::Paper, query, limits.paper),
            self.search_source(&*self.articles, SourceKind::Article, query, limits.article),
        );
        RetrievalResult { papers, articles }
    }

    async fn search_source(
        &self,
        backend: &dyn SearchBackend,
        kind: SourceKind,
        query: &str,
        limit: usize,
    ) -> Vec<Document> {
        if limit == 0 {
            return Vec::new();
        }

        let outcome = match tokio::time::timeout(self.timeout, backend.search(query, limit)).await
        {
            Ok(result) => result,
            Err(_) => Err(RetrievalError::Timeout {
                source_name: backend.name(),
                secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(hits) => {
                debug!(source = backend.name(), hits = hits.len(), "search complete");
                hits.into_iter()
                    .take(limit)
                    .map(|hit| Document::from_hit(kind, hit))
                    .collect()
            }
            Err(e) => {
                warn!(source = backend.name(), error = %e, "search failed, continuing without it");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for RetrievalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalClient")
            .field("papers", &self.papers.name())
            .field("articles", &self.articles.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builds the shared HTTP client used by the search backends.
///
/// # Errors
///
/// Returns [`RetrievalError::Http`] if TLS initialization fails.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, RetrievalError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("fanout-rs/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RetrievalError::Http {
            source_name: "http",
            message: e.to_string(),
        })
}
