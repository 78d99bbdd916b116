//! Core library for `snyk-task`, a build-pipeline step that installs the
//! Snyk CLI, authenticates it, tests the project and optionally uploads a
//! monitor snapshot, reducing the exit codes to one pass/fail verdict.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod ports;

#[cfg(test)]
mod testing;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the step fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    logging::setup_logging(&cli.log_level, cli.json_logs);
    commands::dispatch(&cli.command)
}
