//! Wikipedia article search over the MediaWiki search API.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::SearchBackend;
use crate::core::{RawHit, collapse_whitespace};
use crate::error::RetrievalError;

const SOURCE: &str = "wikipedia";

/// Default Wikipedia site.
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";

/// Matches the highlight markup MediaWiki puts in search snippets.
static TAG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Article search backend for Wikipedia.
#[derive(Debug, Clone)]
pub struct WikipediaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaBackend {
    /// Creates a backend against English Wikipedia.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_WIKIPEDIA_URL.to_string(),
        }
    }

    /// Overrides the site (other languages, test servers).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchBackend for WikipediaBackend {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawHit>, RetrievalError> {
        let srlimit = limit.to_string();
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", srlimit.as_str()),
                ("srprop", "snippet"),
                ("utf8", "1"),
                ("format", "json"),
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

        let mut hits = parse_search_response(&body, &self.base_url)?;
        hits.truncate(limit);
        Ok(hits)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<QueryBlock>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    info: String,
}

/// Parses a MediaWiki `list=search` JSON response into raw hits.
///
/// # Errors
///
/// Returns [`RetrievalError::Parse`] on invalid JSON or an API error object.
pub fn parse_search_response(json: &str, base_url: &str) -> Result<Vec<RawHit>, RetrievalError> {
    let response: SearchResponse =
        serde_json::from_str(json).map_err(|e| RetrievalError::Parse {
            source_name: SOURCE,
            message: e.to_string(),
        })?;

    if let Some(err) = response.error {
        return Err(RetrievalError::Parse {
            source_name: SOURCE,
            message: err.info,
        });
    }

    Ok(response
        .query
        .map(|q| q.search)
        .unwrap_or_default()
        .into_iter()
        .map(|hit| RawHit {
            url: article_url(base_url, &hit.title),
            body: clean_snippet(&hit.snippet),
            title: hit.title,
            authors: Vec::new(),
            published: None,
        })
        .collect())
}

/// Strips highlight tags and decodes HTML entities from a search snippet.
fn clean_snippet(snippet: &str) -> String {
    let stripped = TAG_RE
        .as_ref()
        .map_or_else(|| snippet.into(), |re| re.replace_all(snippet, ""));
    let decoded = quick_xml::escape::unescape(&stripped)
        .map_or_else(|_| stripped.to_string(), std::borrow::Cow::into_owned);
    collapse_whitespace(&decoded)
}

/// Builds the canonical `/wiki/<Title>` URL for an article.
fn article_url(base_url: &str, title: &str) -> String {
    let slug = title.replace(' ', "_");
    match reqwest::Url::parse(base_url) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push("wiki").push(&slug);
            }
            url.to_string()
        }
        Err(_) => format!("{base_url}/wiki/{slug}"),
    }
}
