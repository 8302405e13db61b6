//! Error types for fanout-rs.
//!
//! Each layer owns its error enum; the crate-level [`Error`] wraps them so
//! the CLI can propagate everything with `?`.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Orchestration or provider error.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Search backend error.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// CLI command error.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O error (terminal or socket).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the agent layer (credentials, providers, orchestration).
#[derive(Debug, Error)]
pub enum AgentError {
    /// No credential is configured for any provider.
    #[error("no valid provider configured: supply a Groq or Google API key")]
    NoProviderConfigured,

    /// A specific provider was requested but has no credential.
    #[error("provider '{provider}' is not configured")]
    ProviderNotConfigured {
        /// Provider name.
        provider: String,
    },

    /// Provider client could not be constructed.
    #[error("failed to initialize provider '{provider}': {message}")]
    ProviderInit {
        /// Provider name.
        provider: String,
        /// Underlying cause.
        message: String,
    },

    /// Upstream API call failed (transport, auth, rate limit).
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error message from the SDK.
        message: String,
        /// HTTP status code, when known.
        status: Option<u16>,
    },

    /// Upstream call returned no usable content.
    #[error("empty response from model '{model}'")]
    EmptyResponse {
        /// Model that produced the empty response.
        model: String,
    },

    /// Upstream call did not finish within the per-call bound.
    #[error("request to model '{model}' timed out after {secs}s")]
    Timeout {
        /// Model that timed out.
        model: String,
        /// Timeout in seconds.
        secs: u64,
    },

    /// The operation is not supported by this provider.
    #[error("operation not supported by provider '{provider}'")]
    Unsupported {
        /// Provider name.
        provider: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },

    /// Invalid input rejected before reaching a provider.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Reason for rejection.
        message: String,
    },
}

/// Errors raised by a single search backend.
///
/// These never escape the retrieval client: a failing source is downgraded
/// to an empty result list.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// HTTP transport failure.
    #[error("{source_name} request failed: {message}")]
    Http {
        /// Backend name.
        source_name: &'static str,
        /// Underlying cause.
        message: String,
    },

    /// Non-success HTTP status.
    #[error("{source_name} returned HTTP {status}")]
    Status {
        /// Backend name.
        source_name: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Response body could not be parsed.
    #[error("{source_name} response could not be parsed: {message}")]
    Parse {
        /// Backend name.
        source_name: &'static str,
        /// Parser message.
        message: String,
    },

    /// Backend did not answer within the search timeout.
    #[error("{source_name} search timed out after {secs}s")]
    Timeout {
        /// Backend name.
        source_name: &'static str,
        /// Timeout in seconds.
        secs: u64,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command failed to execute.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Invalid argument value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
