//! Live task host speaking the Azure Pipelines agent protocol.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, service
//! connection secrets as `ENDPOINT_AUTH_PARAMETER_<ID>_<KEY>`, and results
//! leave as `##vso[...]` logging commands on stdout.

use std::env;
use std::path::{Path, PathBuf};

use crate::ports::{AttachmentKind, Platform, TaskHost, TaskResult};

/// Live host backed by the agent's environment and stdout.
pub struct LiveTaskHost;

impl TaskHost for LiveTaskHost {
    fn get_input(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let value = env::var(input_variable(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if required && value.is_none() {
            return Err(format!("Input required: {name}").into());
        }
        Ok(value)
    }

    fn get_bool_input(&self, name: &str, default: bool) -> bool {
        match self.get_input(name, false) {
            Ok(Some(value)) => value.eq_ignore_ascii_case("true"),
            _ => default,
        }
    }

    fn get_auth_token(&self) -> Option<String> {
        if let Ok(Some(endpoint)) = self.get_input("serviceConnectionEndpoint", false) {
            return env::var(endpoint_auth_variable(&endpoint, "apitoken"))
                .ok()
                .filter(|t| !t.is_empty());
        }
        self.get_input("authToken", false).ok().flatten()
    }

    fn which(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }

    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>> {
        let os = env::var("AGENT_OS").unwrap_or_else(|_| env::consts::OS.to_string());
        parse_platform(&os).ok_or_else(|| format!("unrecognized platform: {os}").into())
    }

    fn working_directory(&self) -> PathBuf {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn report_result(&self, result: TaskResult, message: &str) {
        println!("##vso[task.complete result={result};]{}", escape_data(message));
    }

    fn attach_artifact(&self, kind: AttachmentKind, name: &str, path: &Path) {
        println!(
            "##vso[task.addattachment type={};name={};]{}",
            escape_property(kind.as_str()),
            escape_property(name),
            escape_data(&path.display().to_string())
        );
    }
}

fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn endpoint_auth_variable(endpoint: &str, key: &str) -> String {
    format!("ENDPOINT_AUTH_PARAMETER_{}_{}", endpoint.replace('.', "_"), key).to_uppercase()
}

/// Maps an `AGENT_OS` value or Rust target OS name to a platform.
fn parse_platform(os: &str) -> Option<Platform> {
    match os.to_ascii_lowercase().as_str() {
        "linux" => Some(Platform::Linux),
        "windows_nt" | "windows" => Some(Platform::Windows),
        "darwin" | "macos" => Some(Platform::MacOS),
        _ => None,
    }
}

fn escape_data(value: &str) -> String {
    value.replace('%', "%AZP25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(']', "%5D").replace(';', "%3B")
}
