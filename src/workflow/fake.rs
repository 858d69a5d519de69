//! In-memory git backend for workflow tests.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GitError;
use crate::git::GitBackend;

/// A mutating git call observed by [`FakeGit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Stage(String),
    StageAll,
    Commit(String),
    CommitPaths(String, Vec<String>),
}

/// Index simulation: `staged` paths have diffs, `unstaged` paths become
/// staged when added.
#[derive(Default)]
pub struct FakeGit {
    staged: Mutex<Vec<String>>,
    unstaged: Mutex<Vec<String>>,
    calls: Mutex<Vec<GitCall>>,
    unchanged: Vec<String>,
    failing_diffs: Vec<String>,
    failing_commits: Vec<String>,
}

impl FakeGit {
    pub fn with_staged(paths: &[&str]) -> Self {
        Self {
            staged: Mutex::new(paths.iter().map(|p| p.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn unstaged(self, paths: &[&str]) -> Self {
        *self.unstaged.lock().unwrap() = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Paths that `git add` accepts without staging anything.
    pub fn unchanged(mut self, paths: &[&str]) -> Self {
        self.unchanged = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn failing_diff(mut self, path: &str) -> Self {
        self.failing_diffs.push(path.to_string());
        self
    }

    pub fn failing_commit(mut self, path: &str) -> Self {
        self.failing_commits.push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Messages of every commit made, in order.
    pub fn commit_messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Commit(msg) | GitCall::CommitPaths(msg, _) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Diff text the fake reports for a staged path.
pub fn fake_diff(path: &str) -> String {
    format!("diff --git a/{path} b/{path}\n+change in {path}\n")
}

fn failed(operation: &str, stderr: &str) -> GitError {
    GitError::CommandFailed {
        operation: operation.to_string(),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl GitBackend for FakeGit {
    async fn is_repository(&self) -> bool {
        true
    }

    async fn repo_root(&self) -> Result<PathBuf, GitError> {
        Ok(PathBuf::from("/repo"))
    }

    async fn prefix(&self) -> Result<String, GitError> {
        Ok(String::new())
    }

    async fn staged_files(&self) -> Result<Vec<String>, GitError> {
        Ok(self.staged.lock().unwrap().clone())
    }

    async fn diff(&self, path: &str) -> Result<String, GitError> {
        if self.failing_diffs.iter().any(|p| p == path) {
            return Err(failed("diff", "fatal: bad object"));
        }
        let staged = self.staged.lock().unwrap();
        Ok(if staged.iter().any(|p| p == path) {
            fake_diff(path)
        } else {
            String::new()
        })
    }

    async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.record(GitCall::Stage(path.to_string()));
        if self.unchanged.iter().any(|p| p == path) {
            return Ok(());
        }
        self.unstaged.lock().unwrap().retain(|p| p != path);
        self.staged.lock().unwrap().push(path.to_string());
        Ok(())
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.record(GitCall::StageAll);
        let moved: Vec<String> = self.unstaged.lock().unwrap().drain(..).collect();
        self.staged.lock().unwrap().extend(moved);
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let mut staged = self.staged.lock().unwrap();
        if staged.is_empty() {
            return Err(failed("commit", "nothing to commit"));
        }
        self.record(GitCall::Commit(message.to_string()));
        staged.clear();
        Ok(())
    }

    async fn commit_paths(&self, message: &str, paths: &[String]) -> Result<(), GitError> {
        if paths.iter().any(|p| self.failing_commits.contains(p)) {
            return Err(failed("commit", "pre-commit hook rejected the commit"));
        }
        self.record(GitCall::CommitPaths(message.to_string(), paths.to_vec()));
        self.staged.lock().unwrap().retain(|p| !paths.contains(p));
        Ok(())
    }
}
