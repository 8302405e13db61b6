//! Context serialization and prompt assembly.
//!
//! The context block is the only evidence a provider sees, so its layout
//! is fixed and deterministic: identical retrieval results always yield
//! byte-identical context.

use crate::core::{MAX_AUTHORS, MAX_BODY_CHARS, RetrievalResult, truncate_graphemes};

/// Heading of the paper section.
pub const PAPERS_HEADING: &str = "## ARXIV PAPERS:";

/// Heading of the article section.
pub const ARTICLES_HEADING: &str = "## WIKIPEDIA ARTICLES:";

/// Characters of article body shown in the context.
pub const ARTICLE_PREVIEW_CHARS: usize = 200;

/// Serializes a retrieval result into one text block.
///
/// Empty sections are omitted, and the result is `""` exactly when both
/// lists are empty. Entries are numbered from 1 within each section and
/// separated by a blank line.
#[must_use]
pub fn format_context(result: &RetrievalResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !result.papers.is_empty() {
        lines.push(PAPERS_HEADING.to_string());
        for (i, paper) in result.papers.iter().enumerate() {
            let authors: Vec<&str> = paper
                .authors
                .iter()
                .take(MAX_AUTHORS)
                .map(String::as_str)
                .collect();
            lines.push(String::new());
            lines.push(format!("{}. {}", i + 1, paper.title));
            lines.push(format!("   Authors: {}", authors.join(", ")));
            lines.push(format!(
                "   Published: {}",
                paper.published.as_deref().unwrap_or_default()
            ));
            lines.push(format!(
                "   Summary: {}...",
                truncate_graphemes(&paper.summary, MAX_BODY_CHARS)
            ));
            lines.push(format!("   URL: {}", paper.url));
        }
    }

    if !result.articles.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(ARTICLES_HEADING.to_string());
        for (i, article) in result.articles.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. {}", i + 1, article.title));
            lines.push(format!(
                "   {}...",
                truncate_graphemes(&article.summary, ARTICLE_PREVIEW_CHARS)
            ));
            lines.push(format!("   URL: {}", article.url));
        }
    }

    lines.join("\n")
}

/// Builds the user prompt sent to every provider.
///
/// With no context the query goes out verbatim.
#[must_use]
pub fn build_prompt(query: &str, context: &str) -> String {
    if context.is_empty() {
        query.to_string()
    } else {
        format!("{context}\n\nQuestion: {query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Document, RawHit, SourceKind};
    use proptest::prelude::*;

    fn paper(title: &str) -> Document {
        Document::from_hit(
            SourceKind::Paper,
            RawHit {
                title: title.to_string(),
                body: "A study of learning.".to_string(),
                url: "http://arxiv.org/abs/1234.5678v1".to_string(),
                authors: vec!["Ada".to_string(), "Bob".to_string()],
                published: Some("2021-03-04".to_string()),
            },
        )
    }

    fn article(title: &str, body: &str) -> Document {
        Document::from_hit(
            SourceKind::Article,
            RawHit {
                title: title.to_string(),
                body: body.to_string(),
                url: format!("https://en.wikipedia.org/wiki/{title}"),
                ..RawHit::default()
            },
        )
    }

    #[test]
    fn test_empty_result_gives_empty_context() {
        assert_eq!(format_context(&RetrievalResult::default()), "");
    }

    #[test]
    fn test_full_layout() {
        let result = RetrievalResult {
            papers: vec![paper("Deep Nets")],
            articles: vec![article("Machine_learning", "ML is a field.")],
        };
        let expected = "## ARXIV PAPERS:\n\
                        \n\
                        1. Deep Nets\n   \
                        Authors: Ada, Bob\n   \
                        Published: 2021-03-04\n   \
                        Summary: A study of learning....\n   \
                        URL: http://arxiv.org/abs/1234.5678v1\n\
                        \n\
                        ## WIKIPEDIA ARTICLES:\n\
                        \n\
                        1. Machine_learning\n   \
                        ML is a field....\n   \
                        URL: https://en.wikipedia.org/wiki/Machine_learning";
        assert_eq!(format_context(&result), expected);
    }

    #[test]
    fn test_papers_only_omits_article_section() {
        let result = RetrievalResult {
            papers: vec![paper("One"), paper("Two")],
            articles: Vec::new(),
        };
        let context = format_context(&result);
        assert!(context.starts_with(PAPERS_HEADING));
        assert!(context.contains("\n\n2. Two\n"));
        assert!(!context.contains(ARTICLES_HEADING));
    }

    #[test]
    fn test_articles_only_starts_with_heading() {
        let result = RetrievalResult {
            papers: Vec::new(),
            articles: vec![article("Rust", "A language.")],
        };
        let context = format_context(&result);
        assert!(context.starts_with(ARTICLES_HEADING));
        assert!(!context.contains(PAPERS_HEADING));
    }

    #[test]
    fn test_article_body_preview_is_bounded() {
        let body = "x".repeat(MAX_BODY_CHARS);
        let result = RetrievalResult {
            papers: Vec::new(),
            articles: vec![article("Long", &body)],
        };
        let context = format_context(&result);
        let preview = format!("   {}...", "x".repeat(ARTICLE_PREVIEW_CHARS));
        assert!(context.lines().any(|l| l == preview));
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt("What is ML?", ""), "What is ML?");
        assert_eq!(
            build_prompt("What is ML?", "ctx"),
            "ctx\n\nQuestion: What is ML?"
        );
    }

    proptest! {
        #[test]
        fn prop_context_empty_iff_no_documents(
            papers in proptest::collection::vec("[A-Za-z ]{1,12}", 0..4),
            articles in proptest::collection::vec("[A-Za-z ]{1,12}", 0..4),
        ) {
            let result = RetrievalResult {
                papers: papers.iter().map(|t| paper(t)).collect(),
                articles: articles.iter().map(|t| article(t, "body")).collect(),
            };
            let first = format_context(&result);
            prop_assert_eq!(first.is_empty(), result.is_empty());
            prop_assert_eq!(first.contains(PAPERS_HEADING), !papers.is_empty());
            prop_assert_eq!(first.contains(ARTICLES_HEADING), !articles.is_empty());
            prop_assert_eq!(first, format_context(&result));
        }
    }
}
