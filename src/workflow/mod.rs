//! Orchestration of the single-file and recursive modes.
//!
//! Both modes follow the same shape: make sure something is staged, generate
//! message(s) from the staged diff, then let the user confirm or select what
//! gets committed.

pub mod batch;
pub mod selection;
pub mod single;

#[cfg(test)]
mod fake;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::RunMode;
use crate::console::Console;
use crate::error::RunError;
use crate::git::GitBackend;
use crate::llm::MessageGenerator;

pub use batch::{CommitResult, generate_all, run_recursive};
pub use selection::parse_selection;
pub use single::run_single;

/// How a run ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The generated message was committed.
    Committed,
    /// The user declined the commit prompt.
    Declined,
    /// Recursive mode finished; `committed` of the selected files were committed.
    Selected { committed: usize },
}

/// Location of the working directory inside a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub root: PathBuf,
    /// Working directory relative to `root`, as reported by git.
    pub prefix: String,
}

/// Confirm the working directory is a repository and locate its root.
pub async fn locate_repository(git: &dyn GitBackend) -> Result<RepoContext, RunError> {
    if !git.is_repository().await {
        return Err(RunError::NotARepository);
    }
    let root = git.repo_root().await?;
    let prefix = git.prefix().await?;
    debug!("Repository root: {} (prefix '{}')", root.display(), prefix);
    Ok(RepoContext { root, prefix })
}

/// Run the selected mode against a repository.
///
/// `git` must operate from the repository root: staged paths and resolved
/// file arguments are both root-relative.
pub async fn run<C: Console>(
    repo: &RepoContext,
    mode: RunMode,
    git: Arc<dyn GitBackend>,
    generator: Arc<dyn MessageGenerator>,
    console: &mut C,
) -> Result<Outcome, RunError> {
    match mode {
        RunMode::Single(file) => {
            run_single(repo, &file, git.as_ref(), generator.as_ref(), console).await
        }
        RunMode::Recursive => run_recursive(git, generator, console).await,
    }
}
