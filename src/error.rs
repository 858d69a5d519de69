//! Error types for scribe modules using thiserror.

use thiserror::Error;

/// Errors from git subprocess calls.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from the text-generation endpoint.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Request to the text-generation API failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Text-generation API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Text-generation API returned no choices")]
    NoChoices,

    #[error("Model refused to generate a message: {0}")]
    Refusal(String),

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Model returned an empty commit message")]
    EmptyMessage,
}

/// Errors that end a run with a non-zero exit code.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("git executable not found on PATH")]
    GitNotInstalled,

    #[error("Current directory is not a git repository")]
    NotARepository,

    #[error("No file provided and recursive flag is not set")]
    NoTarget,

    #[error("Path '{0}' is outside the repository")]
    OutsideRepository(String),

    #[error("File is not staged")]
    StagingDeclined,

    #[error("No staged files found")]
    NothingStaged,

    #[error("No staged changes for '{0}'")]
    EmptyDiff(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to generate commit message: {0}")]
    Generate(#[from] GenerateError),
}
