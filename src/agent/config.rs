//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! Provider secrets live in the [`CredentialStore`], not here.

use std::time::Duration;

use super::credentials::{CredentialStore, ProviderId};
use crate::error::AgentError;

/// Default paper results per query.
pub const DEFAULT_PAPER_LIMIT: usize = 3;
/// Default article results per query.
pub const DEFAULT_ARTICLE_LIMIT: usize = 3;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default maximum output tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default per-call completion timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default per-source search timeout in seconds.
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Gemini's OpenAI-compatible endpoint.
pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Groq fallback list: the large capable model first, then the small fast one.
pub const DEFAULT_GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];
/// Google fallback list.
pub const DEFAULT_GOOGLE_MODELS: &[&str] = &["gemini-2.0-flash"];

/// Configuration for the search agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Ordered fallback models for Groq.
    pub groq_models: Vec<String>,
    /// Ordered fallback models for Google.
    pub google_models: Vec<String>,
    /// Groq API base URL.
    pub groq_base_url: String,
    /// Google API base URL.
    pub google_base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per answer.
    pub max_tokens: u32,
    /// Per-call completion timeout.
    pub timeout: Duration,
    /// Per-source search timeout.
    pub search_timeout: Duration,
    /// Maximum paper results.
    pub paper_limit: usize,
    /// Maximum article results.
    pub article_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfigBuilder::default().build_unchecked()
    }
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ProviderInit`] if a configured model list is empty.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }

    /// Ordered fallback models for a provider.
    #[must_use]
    pub fn models_for(&self, id: ProviderId) -> &[String] {
        match id {
            ProviderId::Groq => &self.groq_models,
            ProviderId::Google => &self.google_models,
        }
    }

    /// API base URL for a provider.
    #[must_use]
    pub fn base_url_for(&self, id: ProviderId) -> &str {
        match id {
            ProviderId::Groq => &self.groq_base_url,
            ProviderId::Google => &self.google_base_url,
        }
    }
}

/// Reads provider secrets from the environment.
///
/// `GROQ_API_KEY` for Groq; `GOOGLE_API_KEY`, then `GEMINI_API_KEY`, for Google.
/// A blank variable counts as unset.
#[must_use]
pub fn credentials_from_env() -> CredentialStore {
    credentials_from(|key| std::env::var(key).ok())
}

fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> CredentialStore {
    let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let groq = present("GROQ_API_KEY");
    let google = present("GOOGLE_API_KEY").or_else(|| present("GEMINI_API_KEY"));
    let mut store = CredentialStore::new();
    store.configure(groq.as_deref(), google.as_deref());
    store
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    groq_models: Option<Vec<String>>,
    google_models: Option<Vec<String>>,
    groq_base_url: Option<String>,
    google_base_url: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    search_timeout: Option<Duration>,
    paper_limit: Option<usize>,
    article_limit: Option<usize>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.groq_models.is_none() {
            self.groq_models = env_list("FANOUT_GROQ_MODELS");
        }
        if self.google_models.is_none() {
            self.google_models = env_list("FANOUT_GOOGLE_MODELS");
        }
        if self.groq_base_url.is_none() {
            self.groq_base_url = std::env::var("FANOUT_GROQ_BASE_URL").ok();
        }
        if self.google_base_url.is_none() {
            self.google_base_url = std::env::var("FANOUT_GOOGLE_BASE_URL").ok();
        }
        if self.temperature.is_none() {
            self.temperature = env_parse("FANOUT_TEMPERATURE");
        }
        if self.max_tokens.is_none() {
            self.max_tokens = env_parse("FANOUT_MAX_TOKENS");
        }
        if self.timeout.is_none() {
            self.timeout = env_parse("FANOUT_TIMEOUT_SECS").map(Duration::from_secs);
        }
        if self.search_timeout.is_none() {
            self.search_timeout =
                env_parse("FANOUT_SEARCH_TIMEOUT_SECS").map(Duration::from_secs);
        }
        if self.paper_limit.is_none() {
            self.paper_limit = env_parse("FANOUT_PAPER_LIMIT");
        }
        if self.article_limit.is_none() {
            self.article_limit = env_parse("FANOUT_ARTICLE_LIMIT");
        }
        self
    }

    /// Sets the ordered fallback models for a provider.
    #[must_use]
    pub fn models<I, S>(mut self, id: ProviderId, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = Some(models.into_iter().map(Into::into).collect());
        match id {
            ProviderId::Groq => self.groq_models = list,
            ProviderId::Google => self.google_models = list,
        }
        self
    }

    /// Sets the API base URL for a provider.
    #[must_use]
    pub fn base_url(mut self, id: ProviderId, url: impl Into<String>) -> Self {
        let url = Some(url.into());
        match id {
            ProviderId::Groq => self.groq_base_url = url,
            ProviderId::Google => self.google_base_url = url,
        }
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the maximum output tokens.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the per-call completion timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the per-source search timeout.
    #[must_use]
    pub const fn search_timeout(mut self, duration: Duration) -> Self {
        self.search_timeout = Some(duration);
        self
    }

    /// Sets the maximum paper results.
    #[must_use]
    pub const fn paper_limit(mut self, n: usize) -> Self {
        self.paper_limit = Some(n);
        self
    }

    /// Sets the maximum article results.
    #[must_use]
    pub const fn article_limit(mut self, n: usize) -> Self {
        self.article_limit = Some(n);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ProviderInit`] if a provider's model list is
    /// explicitly set to empty.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        for (id, models) in [
            (ProviderId::Groq, &self.groq_models),
            (ProviderId::Google, &self.google_models),
        ] {
            if models.as_ref().is_some_and(Vec::is_empty) {
                return Err(AgentError::ProviderInit {
                    provider: id.to_string(),
                    message: "fallback model list is empty".to_string(),
                });
            }
        }
        for (name, timeout) in [
            ("timeout", self.timeout),
            ("search timeout", self.search_timeout),
        ] {
            if timeout.is_some_and(|t| t.is_zero()) {
                return Err(AgentError::InvalidConfig {
                    message: format!("{name} must be greater than zero"),
                });
            }
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> AgentConfig {
        let defaults = |list: &[&str]| list.iter().map(|m| (*m).to_string()).collect();
        AgentConfig {
            groq_models: self
                .groq_models
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| defaults(DEFAULT_GROQ_MODELS)),
            google_models: self
                .google_models
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| defaults(DEFAULT_GOOGLE_MODELS)),
            groq_base_url: self
                .groq_base_url
                .unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            google_base_url: self
                .google_base_url
                .unwrap_or_else(|| GOOGLE_BASE_URL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            search_timeout: self
                .search_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)),
            paper_limit: self.paper_limit.unwrap_or(DEFAULT_PAPER_LIMIT),
            article_limit: self.article_limit.unwrap_or(DEFAULT_ARTICLE_LIMIT),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let list: Vec<String> = std::env::var(key)
        .ok()?
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    (!list.is_empty()).then_some(list)
}
