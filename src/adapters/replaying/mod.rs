//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod host;
pub mod process;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use host::ReplayingTaskHost;
pub use process::ReplayingProcessRunner;

/// Extracts a `Result` from a recorded output.
///
/// Expects `{"Ok": <value>}` or `{"Err": "message"}`, as written by the
/// recording adapters.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
