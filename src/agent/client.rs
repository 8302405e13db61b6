//! Provider factory.
//!
//! Maps a [`ProviderId`] and its secret to a concrete [`LlmProvider`].

use std::sync::Arc;

use crate::agent::config::AgentConfig;
use crate::agent::credentials::{CredentialStore, ProviderId};
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates an [`LlmProvider`] for `id` using `secret`.
///
/// Both providers are reached through OpenAI-compatible endpoints; the
/// base URL comes from [`AgentConfig::base_url_for`].
///
/// # Errors
///
/// Returns [`AgentError::ProviderInit`] when the secret is blank.
pub fn create_provider(
    id: ProviderId,
    secret: &str,
    config: &AgentConfig,
) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(AgentError::ProviderInit {
            provider: id.to_string(),
            message: "API key is empty".to_string(),
        });
    }
    Ok(Arc::new(OpenAiProvider::new(
        id,
        secret,
        config.base_url_for(id),
    )))
}

/// Creates the provider for `id` from a credential store.
///
/// # Errors
///
/// Returns [`AgentError::ProviderNotConfigured`] when the store holds no
/// secret for `id`.
pub fn provider_from_store(
    id: ProviderId,
    credentials: &CredentialStore,
    config: &AgentConfig,
) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let secret = credentials
        .secret(id)
        .ok_or_else(|| AgentError::ProviderNotConfigured {
            provider: id.to_string(),
        })?;
    create_provider(id, secret, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_per_id() {
        let config = AgentConfig::default();
        for id in ProviderId::ALL {
            let provider = create_provider(id, "key", &config).unwrap_or_else(|_| unreachable!());
            assert_eq!(provider.name(), id.as_str());
        }
    }

    #[test]
    fn test_blank_secret_rejected() {
        let config = AgentConfig::default();
        let result = create_provider(ProviderId::Groq, "  ", &config);
        assert!(matches!(result, Err(AgentError::ProviderInit { .. })));
    }

    #[test]
    fn test_store_without_secret() {
        let config = AgentConfig::default();
        let store = CredentialStore::new().with_keys(Some("gsk"), None);
        assert!(provider_from_store(ProviderId::Groq, &store, &config).is_ok());
        let missing = provider_from_store(ProviderId::Google, &store, &config);
        assert!(matches!(
            missing,
            Err(AgentError::ProviderNotConfigured { .. })
        ));
    }
}
