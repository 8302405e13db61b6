//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};

/// fanout-rs: ask one question, get answers from several LLM providers.
///
/// Retrieves supporting papers (arXiv) and articles (Wikipedia), then
/// asks every configured provider (Groq, Google Gemini) to answer using
/// that evidence.
#[derive(Parser, Debug)]
#[command(name = "fanout-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Groq API key (primary provider).
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub groq_key: Option<String>,

    /// Google API key (secondary provider).
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    pub google_key: Option<String>,

    /// Per-call completion timeout in seconds.
    #[arg(long, env = "FANOUT_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive question loop.
    ///
    /// Prompts for API keys when none are supplied. Type `quit`, `exit`
    /// or `q` (or press Ctrl-D) to leave; Ctrl-C cancels.
    #[command(after_help = r#"Examples:
  fanout-rs repl                              # Keys from env or prompt
  fanout-rs --groq-key gsk_... repl           # Groq only
"#)]
    Repl,

    /// Ask a single question and print the answers.
    #[command(after_help = r#"Examples:
  fanout-rs ask "What is machine learning?"
  fanout-rs ask "transformers" --papers 5 --articles 0
  fanout-rs --format json ask "quantum error correction" | jq '.answers'
"#)]
    Ask {
        /// The question to answer.
        query: String,

        /// Maximum arXiv papers to retrieve (0 skips the source).
        #[arg(long, env = "FANOUT_PAPER_LIMIT")]
        papers: Option<usize>,

        /// Maximum Wikipedia articles to retrieve (0 skips the source).
        #[arg(long, env = "FANOUT_ARTICLE_LIMIT")]
        articles: Option<usize>,
    },

    /// Start the HTTP server and dashboard.
    #[cfg(feature = "server")]
    #[command(after_help = r#"Examples:
  fanout-rs serve                             # Listen on 127.0.0.1:8000
  fanout-rs serve --host 0.0.0.0 --port 8080
"#)]
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// List the models a provider exposes.
    Models {
        /// Provider name (groq, google).
        #[arg(default_value = "groq")]
        provider: String,
    },

    /// Run a diagnostic query and report which providers answer.
    ///
    /// Exits non-zero when no provider answers.
    Check,

    /// Show configured providers and their fallback models.
    Providers,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_arguments() {
        let cli = Cli::try_parse_from([
            "fanout-rs",
            "--format",
            "json",
            "ask",
            "what is rust",
            "--papers",
            "0",
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Ask {
                query,
                papers,
                articles: _,
            } => {
                assert_eq!(query, "what is rust");
                assert_eq!(papers, Some(0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_global_key_after_subcommand() {
        let cli = Cli::try_parse_from(["fanout-rs", "providers", "--groq-key", "gsk_x"])
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(cli.groq_key.as_deref(), Some("gsk_x"));
        assert!(matches!(cli.command, Commands::Providers));
    }
}
