//! The per-query result envelope.

use std::time::Duration;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::answer::AnswerMap;
use crate::core::RetrievalResult;

/// Everything one `search_and_answer` call produced.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The query as submitted.
    pub query: String,
    /// Retrieved documents, grouped by source.
    pub retrieval: RetrievalResult,
    /// One answer per active provider.
    pub answers: AnswerMap,
    /// Context block sent to the providers (`""` when nothing was found).
    pub context: String,
    /// Wall-clock time of the whole pipeline.
    pub elapsed: Duration,
}

impl QueryResult {
    /// Number of paper hits.
    #[must_use]
    pub fn paper_count(&self) -> usize {
        self.retrieval.paper_count()
    }

    /// Number of article hits.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.retrieval.article_count()
    }

    /// Returns `true` when at least one provider answered.
    #[must_use]
    pub fn has_answer(&self) -> bool {
        self.answers.answered_count() > 0
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("QueryResult", 8)?;
        s.serialize_field("query", &self.query)?;
        s.serialize_field("paper_count", &self.paper_count())?;
        s.serialize_field("article_count", &self.article_count())?;
        s.serialize_field("papers", &self.retrieval.papers)?;
        s.serialize_field("articles", &self.retrieval.articles)?;
        s.serialize_field("answers", &self.answers)?;
        s.serialize_field("context", &self.context)?;
        s.serialize_field("elapsed_secs", &self.elapsed.as_secs_f64())?;
        s.end()
    }
}
