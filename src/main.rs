//! Binary entrypoint for the `snyk-task` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Local runs can keep INPUT_* variables in a .env file.
    dotenvy::dotenv().ok();

    match snyk_task::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
