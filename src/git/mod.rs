//! Git operations by shelling out to the system `git` binary.

pub mod cli;
pub mod paths;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::GitError;

pub use cli::{SystemGit, ensure_git_installed};
pub use paths::resolve_repo_path;

/// Repository queries and mutations needed to generate and record commits.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Whether the working directory is inside a git work tree.
    async fn is_repository(&self) -> bool;

    /// Absolute path of the repository root.
    async fn repo_root(&self) -> Result<PathBuf, GitError>;

    /// Working directory relative to the repository root, `/`-terminated or empty.
    async fn prefix(&self) -> Result<String, GitError>;

    /// Repository-relative paths staged against HEAD, in git's order.
    async fn staged_files(&self) -> Result<Vec<String>, GitError>;

    /// Whether `path` appears in [`GitBackend::staged_files`].
    async fn is_staged(&self, path: &str) -> Result<bool, GitError> {
        Ok(self.staged_files().await?.iter().any(|f| f == path))
    }

    /// Unified diff of the staged version of `path` against HEAD.
    async fn diff(&self, path: &str) -> Result<String, GitError>;

    async fn stage(&self, path: &str) -> Result<(), GitError>;

    async fn stage_all(&self) -> Result<(), GitError>;

    /// Commit everything in the index with exactly `message`.
    async fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Commit the staged state of `paths`, and nothing else, with exactly `message`.
    ///
    /// Working-tree edits that were never staged are not included.
    async fn commit_paths(&self, message: &str, paths: &[String]) -> Result<(), GitError>;
}
