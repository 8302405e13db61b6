//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::time::Duration;

use crate::agent::client::provider_from_store;
use crate::agent::{AgentConfig, CredentialStore, ProviderId, SearchAgent, credentials_from_env};
use crate::cli::output::{
    OutputFormat, format_check, format_models, format_providers, format_query_result,
};
use crate::cli::parser::{Cli, Commands};
use crate::cli::repl::Repl;
use crate::error::{AgentError, CommandError, Result};
use crate::retrieval::SourceLimits;

/// Query used by the `check` command.
pub const DIAGNOSTIC_QUERY: &str = "What is machine learning?";

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config = resolve_config(cli)?;
    let credentials = resolve_credentials(cli);

    match &cli.command {
        Commands::Repl => cmd_repl(credentials, config, format),
        Commands::Ask {
            query,
            papers,
            articles,
        } => {
            let limits = SourceLimits {
                paper: papers.unwrap_or(config.paper_limit),
                article: articles.unwrap_or(config.article_limit),
            };
            cmd_ask(credentials, config, query, limits, format)
        }
        #[cfg(feature = "server")]
        Commands::Serve { host, port } => cmd_serve(credentials, config, host, *port),
        Commands::Models { provider } => cmd_models(&credentials, &config, provider, format),
        Commands::Check => cmd_check(credentials, config, format),
        Commands::Providers => Ok(format_providers(&credentials, &config, format)),
    }
}

/// Builds agent configuration from env + CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder();
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let config = builder.from_env().build().map_err(|e| {
        CommandError::ExecutionFailed(format!("Agent configuration error: {e}"))
    })?;
    Ok(config)
}

/// Environment secrets, overridden by flags.
fn resolve_credentials(cli: &Cli) -> CredentialStore {
    credentials_from_env().with_keys(cli.groq_key.as_deref(), cli.google_key.as_deref())
}

/// Creates the tokio runtime bridging the sync CLI to async commands.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

fn build_agent(credentials: CredentialStore, config: AgentConfig) -> Result<SearchAgent> {
    if !credentials.is_usable() {
        return Err(AgentError::NoProviderConfigured.into());
    }
    SearchAgent::from_credentials(credentials, config)
}

fn cmd_ask(
    credentials: CredentialStore,
    config: AgentConfig,
    query: &str,
    limits: SourceLimits,
    format: OutputFormat,
) -> Result<String> {
    if query.trim().is_empty() {
        return Err(CommandError::InvalidArgument("query cannot be empty".to_string()).into());
    }
    let agent = build_agent(credentials, config)?;
    let rt = runtime()?;
    let result = rt.block_on(agent.search_with_limits(query, limits))?;
    Ok(format_query_result(&result, format))
}

fn cmd_repl(
    credentials: CredentialStore,
    config: AgentConfig,
    format: OutputFormat,
) -> Result<String> {
    let rt = runtime()?;
    let outcome = rt.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = std::io::stdout();
        let mut repl = Repl::new(stdin, stdout.lock(), format);

        let credentials = if credentials.is_usable() {
            credentials
        } else {
            repl.prompt_keys(&credentials).await?
        };
        let agent = build_agent(credentials, config)?;
        repl.run(&agent).await?;
        Ok::<_, crate::error::Error>(String::new())
    });
    // A pending stdin read parks a blocking-pool thread that a regular
    // runtime drop would wait on forever.
    rt.shutdown_background();
    outcome
}

fn cmd_models(
    credentials: &CredentialStore,
    config: &AgentConfig,
    provider: &str,
    format: OutputFormat,
) -> Result<String> {
    let id = ProviderId::parse(provider).ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "unknown provider '{provider}' (expected groq or google)"
        ))
    })?;
    let client = provider_from_store(id, credentials, config)?;
    let rt = runtime()?;
    let models = rt.block_on(client.list_models())?;
    Ok(format_models(id, &models, format))
}

fn cmd_check(
    credentials: CredentialStore,
    config: AgentConfig,
    format: OutputFormat,
) -> Result<String> {
    let agent = build_agent(credentials, config)?;
    let rt = runtime()?;
    let result = rt.block_on(agent.search_and_answer(DIAGNOSTIC_QUERY))?;
    let report = format_check(&result, format);
    if result.has_answer() {
        Ok(report)
    } else {
        Err(CommandError::ExecutionFailed(report).into())
    }
}

#[cfg(feature = "server")]
fn cmd_serve(
    credentials: CredentialStore,
    config: AgentConfig,
    host: &str,
    port: u16,
) -> Result<String> {
    use crate::server::{AppState, serve};

    let state = AppState::new(credentials, config)?;
    let rt = runtime()?;
    rt.block_on(serve(state, host, port))
        .map_err(|e| CommandError::ExecutionFailed(format!("HTTP server error: {e}")))?;

    Ok(String::new())
}
