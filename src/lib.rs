//! scribe - A CLI tool that writes commit messages for staged changes using an LLM.
//!
//! # Overview
//!
//! scribe reads staged diffs through the `git` executable, asks a chat
//! completions endpoint for a conventional commit message with a strict
//! single-field JSON schema, and commits the result after the user confirms.
//! Recursive mode does this for every staged file at once and lets the user
//! pick which messages to commit.

pub mod commit;
pub mod config;
pub mod console;
pub mod error;
pub mod git;
pub mod llm;
pub mod workflow;

// Re-export commonly used types
pub use config::{RunMode, Settings};
pub use console::{Console, LineConsole, TerminalConsole};
pub use error::{GenerateError, GitError, RunError};
pub use git::{GitBackend, SystemGit};
pub use llm::{MessageGenerator, OpenAiClient};
pub use workflow::{CommitResult, Outcome, RepoContext};
