//! Shared server state.
//!
//! The current agent sits behind an `RwLock<Option<Arc<_>>>`. Searches
//! clone the `Arc` and release the lock immediately; `/setup` builds a
//! complete new agent and swaps it in, so a search never sees a
//! half-configured agent.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::agent::{AgentConfig, CredentialStore, ProviderId, SearchAgent};
use crate::error::{AgentError, Result};

/// Builds an agent from a credential snapshot.
pub type AgentFactory =
    Arc<dyn Fn(CredentialStore, AgentConfig) -> Result<SearchAgent> + Send + Sync>;

struct Slot {
    credentials: CredentialStore,
    agent: Option<Arc<SearchAgent>>,
}

/// Handle shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    config: AgentConfig,
    factory: AgentFactory,
    slot: Arc<RwLock<Slot>>,
}

impl AppState {
    /// Creates state over the real search backends and providers.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial agent cannot be built.
    pub fn new(credentials: CredentialStore, config: AgentConfig) -> Result<Self> {
        Self::with_factory(credentials, config, Arc::new(SearchAgent::from_credentials))
    }

    /// Creates state with a custom agent factory.
    ///
    /// An agent is built up front when `credentials` is already usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial agent cannot be built.
    pub fn with_factory(
        credentials: CredentialStore,
        config: AgentConfig,
        factory: AgentFactory,
    ) -> Result<Self> {
        let agent = if credentials.is_usable() {
            Some(Arc::new(factory(credentials.clone(), config.clone())?))
        } else {
            None
        };
        Ok(Self {
            config,
            factory,
            slot: Arc::new(RwLock::new(Slot { credentials, agent })),
        })
    }

    /// The agent serving searches, if one is configured.
    pub async fn current_agent(&self) -> Option<Arc<SearchAgent>> {
        self.slot.read().await.agent.clone()
    }

    /// Active providers of the current configuration.
    pub async fn active_providers(&self) -> Vec<ProviderId> {
        self.slot.read().await.credentials.active_providers()
    }

    /// Adds secrets and swaps in a freshly built agent.
    ///
    /// Configuration is additive: a provider configured earlier stays
    /// configured when its key is omitted here.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NoProviderConfigured`] when the resulting
    /// store is still unusable, or the factory's error. The previous agent
    /// stays in place on error.
    pub async fn configure(
        &self,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<Vec<ProviderId>> {
        let mut slot = self.slot.write().await;
        let credentials = slot.credentials.with_keys(primary, secondary);
        if !credentials.is_usable() {
            return Err(AgentError::NoProviderConfigured.into());
        }

        let agent = (self.factory)(credentials.clone(), self.config.clone())?;
        let providers = credentials.active_providers();
        info!(providers = ?providers, "agent reconfigured");

        slot.credentials = credentials;
        slot.agent = Some(Arc::new(agent));
        Ok(providers)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::CompletionOrchestrator;
    use crate::retrieval::RetrievalClient;

    fn offline_factory() -> AgentFactory {
        Arc::new(|credentials: CredentialStore, config: AgentConfig| -> Result<SearchAgent> {
            let retrieval = RetrievalClient::from_config(&config)?;
            let completion = CompletionOrchestrator::new(Vec::new(), &config);
            Ok(SearchAgent::new(credentials, config, retrieval, completion))
        })
    }

    #[tokio::test]
    async fn test_starts_unconfigured() {
        let state = AppState::with_factory(
            CredentialStore::new(),
            AgentConfig::default(),
            offline_factory(),
        )
        .unwrap_or_else(|_| unreachable!());
        assert!(state.current_agent().await.is_none());
        assert!(state.active_providers().await.is_empty());
    }

    #[tokio::test]
    async fn test_configure_is_additive_and_swaps() {
        let state = AppState::with_factory(
            CredentialStore::new(),
            AgentConfig::default(),
            offline_factory(),
        )
        .unwrap_or_else(|_| unreachable!());

        let first = state
            .configure(Some("gsk"), None)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(first, vec![ProviderId::Groq]);
        let before = state.current_agent().await;

        let second = state
            .configure(None, Some("AIza"))
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(second, vec![ProviderId::Groq, ProviderId::Google]);

        let after = state.current_agent().await;
        assert!(before.is_some() && after.is_some());
        assert!(!Arc::ptr_eq(
            &before.unwrap_or_else(|| unreachable!()),
            &after.unwrap_or_else(|| unreachable!())
        ));
    }

    #[tokio::test]
    async fn test_blank_keys_rejected() {
        let state = AppState::with_factory(
            CredentialStore::new(),
            AgentConfig::default(),
            offline_factory(),
        )
        .unwrap_or_else(|_| unreachable!());
        let result = state.configure(Some(" "), None).await;
        assert!(result.is_err());
        assert!(state.current_agent().await.is_none());
    }
}
