//! Per-provider answers and the merged answer map.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::credentials::ProviderId;

/// Outcome of one provider for one query.
///
/// `Unavailable` and `NotConfigured` are distinct from an empty answer:
/// the first means every model failed, the second that the provider had
/// no credential when the query ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ProviderAnswer {
    /// A model produced non-empty text.
    Answered(String),
    /// All models in the fallback list failed.
    Unavailable,
    /// The provider was not active for this query.
    NotConfigured,
}

static NOT_CONFIGURED: ProviderAnswer = ProviderAnswer::NotConfigured;

impl ProviderAnswer {
    /// Returns the answer text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Answered(text) => Some(text),
            Self::Unavailable | Self::NotConfigured => None,
        }
    }

    /// Status label used in JSON responses.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Answered(_) => "answered",
            Self::Unavailable => "unavailable",
            Self::NotConfigured => "not_configured",
        }
    }

    /// Returns `true` for [`ProviderAnswer::Answered`].
    #[must_use]
    pub const fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }
}

/// Answers keyed by provider, iterated in fixed provider order.
///
/// Only providers that were active hold an entry; [`AnswerMap::get`]
/// reports the rest as [`ProviderAnswer::NotConfigured`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    entries: BTreeMap<ProviderId, ProviderAnswer>,
}

impl AnswerMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer for a provider, replacing any previous one.
    pub fn insert(&mut self, id: ProviderId, answer: ProviderAnswer) {
        self.entries.insert(id, answer);
    }

    /// Looks up a provider's answer.
    #[must_use]
    pub fn get(&self, id: ProviderId) -> &ProviderAnswer {
        self.entries.get(&id).unwrap_or(&NOT_CONFIGURED)
    }

    /// Iterates the entries of active providers in provider order.
    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &ProviderAnswer)> {
        self.entries.iter().map(|(id, answer)| (*id, answer))
    }

    /// Number of providers with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no provider has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of providers that answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.values().filter(|a| a.is_answered()).count()
    }
}

impl FromIterator<(ProviderId, ProviderAnswer)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (ProviderId, ProviderAnswer)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Serializes every known provider, filling inactive ones with
/// `not_configured`.
impl Serialize for AnswerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ProviderId::ALL.len()))?;
        for id in ProviderId::ALL {
            map.serialize_entry(id.as_str(), self.get(id))?;
        }
        map.end()
    }
}
