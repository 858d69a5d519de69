//! `GitBackend` implementation backed by the `git` executable.
//!
//! Every operation runs `git` as a subprocess in a fixed directory, inheriting
//! the user's existing git config and identity. Per-path commits are built
//! with plumbing commands against a scratch index, so they record exactly the
//! staged content and skip commit hooks.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{GitError, RunError};
use crate::git::GitBackend;

/// Check that a `git` executable is reachable on `PATH`.
pub fn ensure_git_installed() -> Result<(), RunError> {
    which::which("git").map_err(|_| RunError::GitNotInstalled)?;
    Ok(())
}

/// Runs git commands from a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

/// Extra process state for a single git invocation.
#[derive(Default)]
struct Invocation<'a> {
    /// Alternate index file (`GIT_INDEX_FILE`).
    index_file: Option<&'a Path>,
    /// Bytes written to git's stdin.
    input: Option<&'a [u8]>,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git command and return its stdout, or a descriptive error.
    async fn run(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        self.run_with(args, operation, Invocation::default()).await
    }

    async fn run_with(
        &self,
        args: &[&str],
        operation: &str,
        invocation: Invocation<'_>,
    ) -> Result<String, GitError> {
        debug!("git {} (in {})", args.join(" "), self.workdir().display());

        let spawn_failed = |source: std::io::Error| GitError::SpawnFailed {
            operation: operation.to_string(),
            source,
        };

        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(self.workdir())
            .stdin(if invocation.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(index_file) = invocation.index_file {
            command.env("GIT_INDEX_FILE", index_file);
        }

        let mut child = command.spawn().map_err(spawn_failed)?;
        if let Some(input) = invocation.input
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin.write_all(input).await.map_err(spawn_failed)?;
            // stdin drops here, closing the pipe
        }
        let output = child.wait_with_output().await.map_err(spawn_failed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // `git commit` reports "nothing to commit" on stdout
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a command against a scratch index file.
    async fn run_in_index(
        &self,
        index_file: &Path,
        args: &[&str],
        operation: &str,
    ) -> Result<String, GitError> {
        let invocation = Invocation {
            index_file: Some(index_file),
            ..Default::default()
        };
        self.run_with(args, operation, invocation).await
    }

    /// Commit hash at `HEAD`, or `None` on an unborn branch.
    async fn head(&self) -> Option<String> {
        self.run(&["rev-parse", "--verify", "--quiet", "HEAD"], "rev-parse")
            .await
            .ok()
            .map(|out| out.trim().to_string())
    }

    /// Build a commit of `HEAD` plus the staged state of `paths` and advance
    /// the branch to it. The real index and the working tree are not touched.
    async fn commit_index_entries(
        &self,
        scratch: &Path,
        message: &str,
        paths: &[String],
    ) -> Result<(), GitError> {
        let head = self.head().await;

        match &head {
            Some(head) => {
                self.run_in_index(scratch, &["read-tree", head.as_str()], "read-tree")
                    .await?
            }
            None => {
                self.run_in_index(scratch, &["read-tree", "--empty"], "read-tree")
                    .await?
            }
        };

        // Staged entries for the paths, straight from the real index
        let mut args = vec!["--literal-pathspecs", "ls-files", "--stage", "-z", "--"];
        args.extend(paths.iter().map(String::as_str));
        let entries = self.run(&args, "ls-files").await?;

        let in_index = index_entry_paths(&entries);
        if !entries.is_empty() {
            let invocation = Invocation {
                index_file: Some(scratch),
                input: Some(entries.as_bytes()),
            };
            self.run_with(&["update-index", "-z", "--index-info"], "update-index", invocation)
                .await?;
        }

        // Paths staged for deletion are absent from the real index
        let removed: Vec<&str> = paths
            .iter()
            .map(String::as_str)
            .filter(|p| !in_index.contains(p))
            .collect();
        if !removed.is_empty() {
            let mut args = vec!["update-index", "--force-remove", "--"];
            args.extend(removed);
            self.run_in_index(scratch, &args, "update-index").await?;
        }

        let tree = self.run_in_index(scratch, &["write-tree"], "write-tree").await?;
        let tree = tree.trim();

        if let Some(head) = &head {
            let head_tree_spec = format!("{head}^{{tree}}");
            let head_tree = self
                .run(&["rev-parse", head_tree_spec.as_str()], "rev-parse")
                .await?;
            if head_tree.trim() == tree {
                return Err(GitError::CommandFailed {
                    operation: "commit".to_string(),
                    stderr: format!("nothing staged for {}", paths.join(", ")),
                });
            }
        }

        let mut args = vec!["commit-tree", "-m", message];
        if let Some(head) = &head {
            args.extend(["-p", head.as_str()]);
        }
        args.push(tree);
        let commit = self.run(&args, "commit-tree").await?;
        let commit = commit.trim();

        let mut args = vec!["update-ref", "-m", "scribe: commit", "HEAD", commit];
        if let Some(head) = &head {
            args.push(head.as_str());
        }
        self.run(&args, "update-ref").await?;
        Ok(())
    }
}

#[async_trait]
impl GitBackend for SystemGit {
    async fn is_repository(&self) -> bool {
        match self
            .run(&["rev-parse", "--is-inside-work-tree"], "rev-parse")
            .await
        {
            Ok(out) => out.trim() == "true",
            Err(_) => false,
        }
    }

    async fn repo_root(&self) -> Result<PathBuf, GitError> {
        let out = self
            .run(&["rev-parse", "--show-toplevel"], "rev-parse")
            .await?;
        Ok(PathBuf::from(out.trim_end_matches(['\n', '\r'])))
    }

    async fn prefix(&self) -> Result<String, GitError> {
        let out = self
            .run(&["rev-parse", "--show-prefix"], "rev-parse")
            .await?;
        Ok(out.trim_end_matches(['\n', '\r']).to_string())
    }

    async fn staged_files(&self) -> Result<Vec<String>, GitError> {
        // Unquoted paths, and renames listed as a deletion plus an addition
        let out = self
            .run(
                &["diff", "--cached", "--name-only", "--no-renames", "-z"],
                "diff",
            )
            .await?;
        Ok(parse_nul_separated(&out))
    }

    async fn diff(&self, path: &str) -> Result<String, GitError> {
        self.run(&["diff", "--cached", "--no-renames", "--", path], "diff")
            .await
    }

    async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.run(&["add", "--", path], "add").await?;
        Ok(())
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.run(&["add", "."], "add").await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message], "commit").await?;
        Ok(())
    }

    async fn commit_paths(&self, message: &str, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Err(GitError::CommandFailed {
                operation: "commit".to_string(),
                stderr: "no paths given".to_string(),
            });
        }

        let name = format!("scribe-index-{}", std::process::id());
        let scratch = self
            .run(&["rev-parse", "--git-path", name.as_str()], "rev-parse")
            .await?;
        let scratch = self.workdir().join(scratch.trim_end_matches(['\n', '\r']));

        let result = self.commit_index_entries(&scratch, message, paths).await;
        let _ = tokio::fs::remove_file(&scratch).await;
        result
    }
}

/// Split `-z` output into paths, dropping empty records.
fn parse_nul_separated(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// Paths of `ls-files --stage -z` records (`<mode> <object> <stage>\t<path>`).
fn index_entry_paths(entries: &str) -> Vec<&str> {
    entries
        .split('\0')
        .filter_map(|record| record.split_once('\t').map(|(_, path)| path))
        .collect()
}
