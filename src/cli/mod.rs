//! CLI layer for fanout-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! one-shot questions, the interactive loop, the HTTP server, and
//! provider diagnostics.

pub mod commands;
pub mod output;
pub mod parser;
pub mod repl;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
