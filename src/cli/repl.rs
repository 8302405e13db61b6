//! Interactive question loop.
//!
//! Reads one query per line and prints the rendered result. The loop ends
//! on `quit`/`exit`/`q`, end of input, or Ctrl-C; a query in flight is
//! abandoned when Ctrl-C arrives.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use super::output::{OutputFormat, format_query_result};
use crate::agent::{CredentialStore, SearchAgent};
use crate::error::Result;

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// How a REPL session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed a quit word.
    Quit,
    /// Input reached end of file.
    EndOfInput,
    /// Ctrl-C was pressed.
    Interrupted,
}

/// Line-oriented interactive session over any async reader.
pub struct Repl<R, W> {
    lines: Lines<R>,
    out: W,
    format: OutputFormat,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Creates a session reading from `input` and writing to `out`.
    pub fn new(input: R, out: W, format: OutputFormat) -> Self {
        Self {
            lines: input.lines(),
            out,
            format,
        }
    }

    /// Asks for API keys on the terminal.
    ///
    /// Returns `credentials` extended with whatever was typed; an empty
    /// line skips that provider.
    pub async fn prompt_keys(&mut self, credentials: &CredentialStore) -> Result<CredentialStore> {
        writeln!(self.out, "No API keys found in flags or environment.")?;
        let groq = self.ask("Groq API key (Enter to skip): ").await?;
        let google = self.ask("Google API key (Enter to skip): ").await?;
        Ok(credentials.with_keys(groq.as_deref(), google.as_deref()))
    }

    /// Runs the question loop until the user leaves.
    pub async fn run(&mut self, agent: &SearchAgent) -> Result<ExitReason> {
        self.banner(agent)?;

        loop {
            write!(self.out, "\nEnter your query (or 'quit' to exit): ")?;
            self.out.flush()?;

            let line = tokio::select! {
                line = self.lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => return self.leave(ExitReason::Interrupted),
            };
            let Some(line) = line else {
                return self.leave(ExitReason::EndOfInput);
            };

            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if QUIT_WORDS.contains(&query.to_lowercase().as_str()) {
                return self.leave(ExitReason::Quit);
            }

            debug!(query, "repl query");
            let outcome = tokio::select! {
                outcome = agent.search_and_answer(query) => outcome,
                _ = tokio::signal::ctrl_c() => {
                    writeln!(self.out, "\ninterrupted")?;
                    return self.leave(ExitReason::Interrupted);
                }
            };

            match outcome {
                Ok(result) => writeln!(self.out, "\n{}", format_query_result(&result, self.format))?,
                Err(e) => writeln!(self.out, "\nError: {e}")?,
            }
        }
    }

    fn banner(&mut self, agent: &SearchAgent) -> Result<()> {
        let providers: Vec<String> = agent
            .active_providers()
            .iter()
            .map(|id| {
                format!(
                    "{id} ({})",
                    agent.config().models_for(*id).join(", ")
                )
            })
            .collect();
        writeln!(self.out, "fanout-rs interactive search")?;
        writeln!(self.out, "Active providers: {}", providers.join("; "))?;
        Ok(())
    }

    fn leave(&mut self, reason: ExitReason) -> Result<ExitReason> {
        writeln!(self.out, "\nGoodbye!")?;
        self.out.flush()?;
        Ok(reason)
    }

    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let line = self.lines.next_line().await?;
        Ok(line
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()))
    }
}
