//! arXiv paper search over the public Atom export API.

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::SearchBackend;
use crate::core::{RawHit, collapse_whitespace};
use crate::error::RetrievalError;

const SOURCE: &str = "arxiv";

/// Default arXiv API endpoint.
pub const DEFAULT_ARXIV_URL: &str = "http://export.arxiv.org/api/query";

/// Paper search backend for arXiv.
#[derive(Debug, Clone)]
pub struct ArxivBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivBackend {
    /// Creates a backend against the public endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_ARXIV_URL.to_string(),
        }
    }

    /// Overrides the endpoint (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl SearchBackend for ArxivBackend {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>, RetrievalError> {
        let search_query = format!("all:{query}");
        let max_results = limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .map_err(|e| RetrievalError::Http {
                source_name: SOURCE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                source_name: SOURCE,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| RetrievalError::Http {
            source_name: SOURCE,
            message: e.to_string(),
        })?;

        let mut hits = parse_feed(&body)?;
        hits.truncate(limit);
        Ok(hits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Id,
    Published,
    AuthorName,
}

/// Parses an arXiv Atom feed into raw hits.
///
/// Error entries (ids under `/api/errors`) are skipped. Titles and
/// summaries have their hard line wraps collapsed, and `published` is
/// reduced to its date part.
///
/// # Errors
///
/// Returns [`RetrievalError::Parse`] on malformed XML.
pub fn parse_feed(xml: &str) -> Result<Vec<RawHit>, RetrievalError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut hits = Vec::new();
    let mut entry: Option<RawHit> = None;
    let mut field: Option<Field> = None;
    let mut in_author = false;
    let mut author_name = String::new();

    loop {
        let event = reader.read_event().map_err(|e| RetrievalError::Parse {
            source_name: SOURCE,
            message: format!("at byte {}: {e}", reader.buffer_position()),
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                field = match name.as_ref() {
                    b"entry" => {
                        entry = Some(RawHit::default());
                        None
                    }
                    b"author" if entry.is_some() => {
                        in_author = true;
                        author_name.clear();
                        None
                    }
                    b"name" if in_author => Some(Field::AuthorName),
                    b"title" if entry.is_some() => Some(Field::Title),
                    b"summary" if entry.is_some() => Some(Field::Summary),
                    b"id" if entry.is_some() => Some(Field::Id),
                    b"published" if entry.is_some() => Some(Field::Published),
                    _ => None,
                };
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| RetrievalError::Parse {
                    source_name: SOURCE,
                    message: e.to_string(),
                })?;
                append_field(entry.as_mut(), field, &text, &mut author_name);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let text = String::from_utf8_lossy(&raw);
                append_field(entry.as_mut(), field, &text, &mut author_name);
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"entry" => {
                        if let Some(hit) = entry.take().and_then(finish_entry) {
                            hits.push(hit);
                        }
                    }
                    b"author" if in_author => {
                        in_author = false;
                        let name = collapse_whitespace(&author_name);
                        if let (Some(hit), false) = (entry.as_mut(), name.is_empty()) {
                            hit.authors.push(name);
                        }
                    }
                    _ => {}
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(hits)
}

fn append_field(entry: Option<&mut RawHit>, field: Option<Field>, text: &str, author: &mut String) {
    let (Some(hit), Some(field)) = (entry, field) else {
        return;
    };
    let target = match field {
        Field::Title => &mut hit.title,
        Field::Summary => &mut hit.body,
        Field::Id => &mut hit.url,
        Field::AuthorName => author,
        Field::Published => {
            hit.published = text.split('T').next().map(str::to_string);
            return;
        }
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

fn finish_entry(mut hit: RawHit) -> Option<RawHit> {
    if hit.url.contains("/api/errors") || hit.title.trim().is_empty() {
        return None;
    }
    hit.title = collapse_whitespace(&hit.title);
    hit.body = collapse_whitespace(&hit.body);
    hit.url = hit.url.trim().to_string();
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models are based on
  complex recurrent &amp; convolutional networks.</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <author><name>Niki Parmar</name><arxiv:affiliation>Google</arxiv:affiliation></author>
    <author><name>Jakob Uszkoreit</name></author>
    <arxiv:comment>15 pages</arxiv:comment>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1810.04805v2</id>
    <published>2018-10-11T00:50:01Z</published>
    <title>BERT</title>
    <summary>Pre-training of deep bidirectional transformers.</summary>
    <author><name>Jacob Devlin</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_entries() {
        let hits = parse_feed(FEED).unwrap_or_else(|_| unreachable!());
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.title, "Attention Is All You Need");
        assert_eq!(first.url, "http://arxiv.org/abs/1706.03762v7");
        assert_eq!(first.published.as_deref(), Some("2017-06-12"));
        assert_eq!(
            first.body,
            "The dominant sequence transduction models are based on complex recurrent & convolutional networks."
        );
        assert_eq!(first.authors.len(), 4);
        assert_eq!(first.authors[2], "Niki Parmar");

        assert_eq!(hits[1].title, "BERT");
        assert_eq!(hits[1].authors, vec!["Jacob Devlin".to_string()]);
    }

    #[test]
    fn test_feed_title_not_captured() {
        let hits = parse_feed(FEED).unwrap_or_else(|_| unreachable!());
        assert!(hits.iter().all(|h| !h.title.contains("ArXiv Query")));
    }

    #[test]
    fn test_error_entry_skipped() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
  </entry>
</feed>"#;
        let hits = parse_feed(xml).unwrap_or_else(|_| unreachable!());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>x</title></feed>"#;
        let hits = parse_feed(xml).unwrap_or_else(|_| unreachable!());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse_feed("<feed><entry><title>x</entry></feed>");
        assert!(matches!(result, Err(RetrievalError::Parse { .. })));
    }
}
