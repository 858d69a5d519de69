//! Commit message prompt construction and response parsing.

pub mod message;
pub mod prompt;

pub use message::{CommitMessage, parse_commit_message};
pub use prompt::{SYSTEM_INSTRUCTION, build_commit_prompt, response_schema};
