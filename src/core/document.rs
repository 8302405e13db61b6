//! Retrieved documents and the per-query retrieval result.

use serde::{Deserialize, Serialize};

use super::text::truncate_graphemes;

/// Maximum characters kept from a paper summary or article body.
pub const MAX_BODY_CHARS: usize = 300;

/// Maximum authors kept per paper.
pub const MAX_AUTHORS: usize = 3;

/// Which external source produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Academic paper index (arXiv).
    Paper,
    /// General knowledge index (Wikipedia).
    Article,
}

impl SourceKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Article => "article",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw hit as returned by a search backend, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHit {
    /// Title.
    pub title: String,
    /// Summary (papers) or snippet (articles).
    pub body: String,
    /// Origin URL.
    pub url: String,
    /// Author names (papers only).
    pub authors: Vec<String>,
    /// Publication date, `YYYY-MM-DD` (papers only).
    pub published: Option<String>,
}

/// A normalized retrieval hit.
///
/// Text fields are bounded at construction so downstream formatting has a
/// predictable size ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source that produced this document.
    pub source: SourceKind,
    /// Title.
    pub title: String,
    /// Summary or body, at most [`MAX_BODY_CHARS`] characters.
    pub summary: String,
    /// Origin URL.
    pub url: String,
    /// First [`MAX_AUTHORS`] authors (empty for articles).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Publication date (papers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl Document {
    /// Normalizes a raw hit from the given source.
    #[must_use]
    pub fn from_hit(source: SourceKind, hit: RawHit) -> Self {
        let (authors, published) = match source {
            SourceKind::Paper => (
                hit.authors.into_iter().take(MAX_AUTHORS).collect(),
                hit.published,
            ),
            SourceKind::Article => (Vec::new(), None),
        };

        Self {
            source,
            title: hit.title,
            summary: truncate_graphemes(&hit.body, MAX_BODY_CHARS).to_string(),
            url: hit.url,
            authors,
            published,
        }
    }
}

/// Documents retrieved for one query, grouped by source.
///
/// Either list may be empty; a failed source shows up as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Paper hits, in backend relevance order.
    pub papers: Vec<Document>,
    /// Article hits, in backend relevance order.
    pub articles: Vec<Document>,
}

impl RetrievalResult {
    /// Returns `true` when neither source produced anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty() && self.articles.is_empty()
    }

    /// Number of paper hits.
    #[must_use]
    pub fn paper_count(&self) -> usize {
        self.papers.len()
    }

    /// Number of article hits.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper_hit() -> RawHit {
        RawHit {
            title: "Attention Is All You Need".to_string(),
            body: "x".repeat(500),
            url: "http://arxiv.org/abs/1706.03762v7".to_string(),
            authors: vec![
                "Ashish Vaswani".to_string(),
                "Noam Shazeer".to_string(),
                "Niki Parmar".to_string(),
                "Jakob Uszkoreit".to_string(),
            ],
            published: Some("2017-06-12".to_string()),
        }
    }

    #[test]
    fn test_paper_fields_bounded() {
        let doc = Document::from_hit(SourceKind::Paper, paper_hit());
        assert_eq!(doc.summary.chars().count(), MAX_BODY_CHARS);
        assert_eq!(doc.authors.len(), MAX_AUTHORS);
        assert_eq!(doc.published.as_deref(), Some("2017-06-12"));
    }

    #[test]
    fn test_article_drops_paper_metadata() {
        let doc = Document::from_hit(SourceKind::Article, paper_hit());
        assert!(doc.authors.is_empty());
        assert!(doc.published.is_none());
        assert_eq!(doc.source, SourceKind::Article);
    }

    #[test]
    fn test_retrieval_result_counts() {
        let result = RetrievalResult {
            papers: vec![Document::from_hit(SourceKind::Paper, paper_hit())],
            articles: Vec::new(),
        };
        assert_eq!(result.paper_count(), 1);
        assert_eq!(result.article_count(), 0);
        assert!(!result.is_empty());
        assert!(RetrievalResult::default().is_empty());
    }

    #[test]
    fn test_source_kind_serialization() {
        let json = serde_json::to_string(&SourceKind::Paper).unwrap_or_default();
        assert_eq!(json, "\"paper\"");
    }
}
