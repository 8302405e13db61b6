//! Output rendering for CLI commands.
//!
//! Every renderer returns a `String`; the binary decides where it goes.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::{AgentConfig, CredentialStore, ProviderAnswer, ProviderId, QueryResult};

const RULE_HEAVY: &str = "============================================================";
const RULE_LIGHT: &str = "------------------------------------------------------------";

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name, falling back to text for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes a value as pretty JSON.
    ///
    /// Serialization of the crate's own types cannot fail; an error object
    /// is emitted if it somehow does.
    #[must_use]
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
    }
}

/// Renders one provider's outcome as a line of text.
#[must_use]
pub fn describe_answer(id: ProviderId, answer: &ProviderAnswer) -> String {
    match answer {
        ProviderAnswer::Answered(text) => text.trim().to_string(),
        ProviderAnswer::Unavailable => {
            format!("No answer from provider {id}: every model failed or timed out.")
        }
        ProviderAnswer::NotConfigured => format!("Provider {id} not configured."),
    }
}

/// Formats a query result.
#[must_use]
pub fn format_query_result(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format.to_json(result),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "{RULE_HEAVY}");
            let _ = writeln!(out, "SEARCH RESULTS & AI ANALYSIS");
            let _ = writeln!(out, "{RULE_HEAVY}");
            let _ = writeln!(out);
            let _ = writeln!(out, "Query: {}", result.query);
            let _ = writeln!(out);
            let _ = writeln!(out, "arXiv papers found: {}", result.paper_count());
            for (i, paper) in result.retrieval.papers.iter().enumerate() {
                let _ = writeln!(out, "  {}. {} <{}>", i + 1, paper.title, paper.url);
            }
            let _ = writeln!(out, "Wikipedia articles found: {}", result.article_count());
            for (i, article) in result.retrieval.articles.iter().enumerate() {
                let _ = writeln!(out, "  {}. {} <{}>", i + 1, article.title, article.url);
            }
            if result.retrieval.is_empty() {
                let _ = writeln!(
                    out,
                    "\nNote: search found nothing; answers were generated without context."
                );
            }

            let _ = writeln!(out);
            let _ = writeln!(out, "{RULE_LIGHT}");
            let _ = writeln!(out, "AI GENERATED ANSWERS");
            let _ = writeln!(out, "{RULE_LIGHT}");
            for id in ProviderId::ALL {
                let answer = result.answers.get(id);
                let _ = writeln!(out);
                let _ = writeln!(out, "[{}]", id.as_str().to_uppercase());
                let _ = writeln!(out, "{}", describe_answer(id, answer));
            }

            if !result.has_answer() {
                let _ = writeln!(
                    out,
                    "\nNote: no provider produced an answer. Check the API keys or the service status."
                );
            }
            let _ = write!(out, "\nTime: {:.1}s", result.elapsed.as_secs_f64());
            out
        }
    }
}

/// Describes configured providers and their fallback lists.
#[derive(Debug, Serialize)]
struct ProviderInfo<'a> {
    provider: ProviderId,
    configured: bool,
    base_url: &'a str,
    models: &'a [String],
}

/// Formats the provider overview.
#[must_use]
pub fn format_providers(
    credentials: &CredentialStore,
    config: &AgentConfig,
    format: OutputFormat,
) -> String {
    let infos: Vec<ProviderInfo<'_>> = ProviderId::ALL
        .into_iter()
        .map(|id| ProviderInfo {
            provider: id,
            configured: credentials.secret(id).is_some(),
            base_url: config.base_url_for(id),
            models: config.models_for(id),
        })
        .collect();

    match format {
        OutputFormat::Json => format.to_json(&infos),
        OutputFormat::Text => {
            let mut out = String::new();
            for info in &infos {
                let state = if info.configured {
                    "configured"
                } else {
                    "not configured"
                };
                let _ = writeln!(out, "{} ({state})", info.provider);
                let _ = writeln!(out, "  endpoint: {}", info.base_url);
                let _ = writeln!(out, "  models:   {}", info.models.join(" -> "));
            }
            out.trim_end().to_string()
        }
    }
}

/// Formats a provider's model listing.
#[must_use]
pub fn format_models(id: ProviderId, models: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format.to_json(&serde_json::json!({
            "provider": id,
            "models": models,
        })),
        OutputFormat::Text => {
            if models.is_empty() {
                return format!("Provider {id} reported no models.");
            }
            let mut out = format!("Models available from {id} ({}):", models.len());
            for model in models {
                let _ = write!(out, "\n  {model}");
            }
            out
        }
    }
}

/// Formats the outcome of the diagnostic check.
#[must_use]
pub fn format_check(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format.to_json(&serde_json::json!({
            "ok": result.has_answer(),
            "query": result.query,
            "paper_count": result.paper_count(),
            "article_count": result.article_count(),
            "provider_status": status_map(result),
        })),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "Diagnostic query: {}", result.query);
            let _ = writeln!(
                out,
                "Retrieval: {} papers, {} articles",
                result.paper_count(),
                result.article_count()
            );
            for id in ProviderId::ALL {
                let answer = result.answers.get(id);
                let _ = writeln!(out, "  {id:<8} {}", answer.status());
            }
            if result.has_answer() {
                let _ = write!(out, "[OK] at least one provider answered.");
            } else {
                let _ = write!(out, "[FAIL] no provider answered.");
            }
            out
        }
    }
}

/// Maps each provider name to its status label.
#[must_use]
pub fn status_map(result: &QueryResult) -> serde_json::Map<String, serde_json::Value> {
    ProviderId::ALL
        .into_iter()
        .map(|id| {
            (
                id.as_str().to_string(),
                serde_json::Value::from(result.answers.get(id).status()),
            )
        })
        .collect()
}
