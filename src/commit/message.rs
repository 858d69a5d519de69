//! Parsing of the model's structured commit message output.

use serde::Deserialize;
use tracing::debug;

use crate::error::GenerateError;
use crate::llm::extract_json;

/// Structured output returned by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitMessage {
    pub commit_message: String,
}

/// Parse model output into the commit message string.
///
/// The message is returned exactly as the model wrote it.
pub fn parse_commit_message(content: &str) -> Result<String, GenerateError> {
    let json_str = extract_json(content);
    let parsed: CommitMessage = serde_json::from_str(&json_str).map_err(|e| {
        debug!("Raw response: {}", content);
        let snippet: String = content.chars().take(200).collect();
        GenerateError::InvalidJson(format!("{}. Response: {}", e, snippet))
    })?;

    if parsed.commit_message.trim().is_empty() {
        return Err(GenerateError::EmptyMessage);
    }

    Ok(parsed.commit_message)
}
