//! HTTP routes: setup, search, health, and the dashboard page.
//!
//! Every route is served at the root and again under `/api`. Bad input
//! gets a JSON body with `success: false` and an `error` message, never
//! a plain-text rejection.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::dashboard::DASHBOARD_HTML;
use super::state::AppState;
use crate::agent::{ProviderId, QueryResult};
use crate::error::{AgentError, Error};
use crate::retrieval::SourceLimits;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/setup", post(setup))
        .route("/search", post(search))
        .route("/health", get(health));

    Router::new()
        .route("/", get(dashboard))
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
}

/// Body of `POST /setup`.
#[derive(Debug, Default, Deserialize)]
pub struct SetupRequest {
    /// Groq key.
    #[serde(default, alias = "primary_key")]
    pub groq_key: Option<String>,
    /// Google key.
    #[serde(default, alias = "secondary_key")]
    pub google_key: Option<String>,
}

/// Response of `POST /setup`.
#[derive(Debug, Serialize)]
pub struct SetupResponse {
    /// Whether the agent was (re)configured.
    pub success: bool,
    /// Confirmation message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Providers active after the call.
    pub providers: Vec<ProviderId>,
}

const fn default_true() -> bool {
    true
}

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// The question.
    #[serde(default)]
    pub query: String,
    /// Query the paper source.
    #[serde(default = "default_true", alias = "include_arxiv")]
    pub include_paper_source: bool,
    /// Query the article source.
    #[serde(default = "default_true", alias = "include_wikipedia")]
    pub include_article_source: bool,
}

/// Response of `POST /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Whether the pipeline ran.
    pub success: bool,
    /// The query as received.
    pub query: String,
    /// Papers retrieved.
    pub paper_count: usize,
    /// Articles retrieved.
    pub article_count: usize,
    /// Answer text per provider; `null` when there is none.
    pub responses: BTreeMap<ProviderId, Option<String>>,
    /// `answered`, `unavailable`, or `not_configured` per provider.
    pub provider_status: BTreeMap<ProviderId, &'static str>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    fn from_result(result: &QueryResult) -> Self {
        Self {
            success: true,
            query: result.query.clone(),
            paper_count: result.paper_count(),
            article_count: result.article_count(),
            responses: ProviderId::ALL
                .into_iter()
                .map(|id| (id, result.answers.get(id).text().map(str::to_string)))
                .collect(),
            provider_status: ProviderId::ALL
                .into_iter()
                .map(|id| (id, result.answers.get(id).status()))
                .collect(),
            error: None,
        }
    }

    fn failure(query: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            query,
            paper_count: 0,
            article_count: 0,
            responses: BTreeMap::new(),
            provider_status: BTreeMap::new(),
            error: Some(error.into()),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Whether an agent is configured.
    pub ready: bool,
    /// Active providers.
    pub providers: Vec<ProviderId>,
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ready: state.current_agent().await.is_some(),
        providers: state.active_providers().await,
    })
}

#[instrument(skip_all)]
async fn setup(
    State(state): State<AppState>,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let providers = state.active_providers().await;
            return setup_error(rejection.body_text(), providers);
        }
    };

    let has_key = |k: &Option<String>| k.as_deref().is_some_and(|k| !k.trim().is_empty());
    if !has_key(&request.groq_key) && !has_key(&request.google_key) {
        let providers = state.active_providers().await;
        return setup_error("Please provide at least one API key".to_string(), providers);
    }

    match state
        .configure(request.groq_key.as_deref(), request.google_key.as_deref())
        .await
    {
        Ok(providers) => {
            info!(providers = ?providers, "setup complete");
            let body = SetupResponse {
                success: true,
                message: Some("Setup successful".to_string()),
                error: None,
                providers,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "setup failed");
            let providers = state.active_providers().await;
            setup_error(e.to_string(), providers)
        }
    }
}

fn setup_error(error: String, providers: Vec<ProviderId>) -> Response {
    let body = SetupResponse {
        success: false,
        message: None,
        error: Some(error),
        providers,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[instrument(skip_all)]
async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let body = SearchResponse::failure(String::new(), rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    if request.query.trim().is_empty() {
        let body = SearchResponse::failure(request.query, "Please enter a search query");
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let Some(agent) = state.current_agent().await else {
        let body = SearchResponse::failure(
            request.query,
            "API not configured. Please set up API keys first.",
        );
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    let config = agent.config();
    let limits = SourceLimits {
        paper: if request.include_paper_source {
            config.paper_limit
        } else {
            0
        },
        article: if request.include_article_source {
            config.article_limit
        } else {
            0
        },
    };

    match agent.search_with_limits(&request.query, limits).await {
        Ok(result) => {
            info!(
                papers = result.paper_count(),
                articles = result.article_count(),
                "search served"
            );
            (StatusCode::OK, Json(SearchResponse::from_result(&result))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "search failed");
            let error = Error::from(e);
            let body = SearchResponse::failure(request.query, error.to_string());
            (status_for(&error), Json(body)).into_response()
        }
    }
}

/// Maps a crate error to an HTTP status.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Agent(AgentError::InvalidQuery { .. } | AgentError::NoProviderConfigured) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "ml"}"#).unwrap_or_else(|_| unreachable!());
        assert!(request.include_paper_source);
        assert!(request.include_article_source);

        let request: SearchRequest =
            serde_json::from_str(r#"{"query": "ml", "include_arxiv": false}"#)
                .unwrap_or_else(|_| unreachable!());
        assert!(!request.include_paper_source);
    }

    #[test]
    fn test_setup_request_aliases() {
        let request: SetupRequest =
            serde_json::from_str(r#"{"primary_key": "gsk", "secondary_key": "AIza"}"#)
                .unwrap_or_else(|_| unreachable!());
        assert_eq!(request.groq_key.as_deref(), Some("gsk"));
        assert_eq!(request.google_key.as_deref(), Some("AIza"));
    }

    #[test]
    fn test_status_mapping() {
        let invalid = Error::Agent(AgentError::InvalidQuery {
            message: "x".to_string(),
        });
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);
        let io = Error::Io(std::io::Error::other("boom"));
        assert_eq!(status_for(&io), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
