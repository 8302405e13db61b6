//! Provider identities and the credential store.
//!
//! Configuration is additive: supplying an empty or absent value never
//! clears a secret that was set earlier. Agents take an immutable snapshot
//! of the store when they are built.

use serde::{Deserialize, Serialize};

/// Identifier of a hosted completion provider.
///
/// Declaration order is the fixed invocation and merge order:
/// primary (`Groq`) before secondary (`Google`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Primary provider (Groq, OpenAI-compatible endpoint).
    Groq,
    /// Secondary provider (Google Gemini, OpenAI-compatible endpoint).
    Google,
}

impl ProviderId {
    /// All providers in invocation order.
    pub const ALL: [Self; 2] = [Self::Groq, Self::Google];

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Google => "google",
        }
    }

    /// Parses a provider name (case-insensitive).
    ///
    /// Accepts `primary`/`secondary` as aliases.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" | "primary" => Some(Self::Groq),
            "google" | "gemini" | "secondary" => Some(Self::Google),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Holds zero or more provider secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    groq: Option<String>,
    google: Option<String>,
}

impl CredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whichever non-empty secrets are supplied.
    ///
    /// Values are trimmed; empty or absent values leave the existing
    /// secret untouched.
    pub fn configure(&mut self, primary: Option<&str>, secondary: Option<&str>) {
        if let Some(key) = non_empty(primary) {
            self.groq = Some(key);
        }
        if let Some(key) = non_empty(secondary) {
            self.google = Some(key);
        }
    }

    /// Returns a copy of this store with additional secrets applied.
    #[must_use]
    pub fn with_keys(&self, primary: Option<&str>, secondary: Option<&str>) -> Self {
        let mut next = self.clone();
        next.configure(primary, secondary);
        next
    }

    /// Returns the secret for a provider, if set.
    #[must_use]
    pub fn secret(&self, id: ProviderId) -> Option<&str> {
        match id {
            ProviderId::Groq => self.groq.as_deref(),
            ProviderId::Google => self.google.as_deref(),
        }
    }

    /// Providers with a non-empty secret, in invocation order.
    #[must_use]
    pub fn active_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.secret(*id).is_some())
            .collect()
    }

    /// Returns `true` when at least one provider is active.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.groq.is_some() || self.google.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("CredentialStore")
            .field("groq", &mask(&self.groq))
            .field("google", &mask(&self.google))
            .finish()
    }
}
