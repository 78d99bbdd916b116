//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `snyk-task`.
#[derive(Debug, Parser)]
#[command(
    name = "snyk-task",
    version,
    about = "Install, authenticate and run the Snyk CLI as a pipeline step"
)]
pub struct Cli {
    /// Log level, overridden by `RUST_LOG`.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the step against the pipeline agent.
    Run {
        /// Log step arguments and list the working directory first.
        #[arg(long)]
        debug: bool,
    },
    /// Re-run a recorded step from its cassettes.
    Replay {
        /// Directory holding the recorded session cassettes.
        dir: PathBuf,
        /// Log step arguments and list the working directory first.
        #[arg(long)]
        debug: bool,
    },
}
