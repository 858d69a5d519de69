//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};
use serde_json::json;

/// A test git repository builder for integration tests.
///
/// The repository gets a local identity so `git commit` works without any
/// global configuration, and starts with one commit so `HEAD` exists.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a repository in a temp directory with an initial commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
            config.set_bool("commit.gpgsign", false).expect("Failed to set commit.gpgsign");
        }
        let test_repo = Self { dir, repo };
        test_repo.write("README.md", "# test\n");
        test_repo.stage("README.md");
        test_repo.commit_index("chore: initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Add a file to the index.
    pub fn stage(&self, relative: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.read(false).expect("Failed to reload index");
        index.add_path(Path::new(relative)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Write and stage a file in one step.
    pub fn write_staged(&self, relative: &str, content: &str) {
        self.write(relative, content);
        self.stage(relative);
    }

    /// Move a file and stage the move, like `git mv`.
    pub fn rename_staged(&self, from: &str, to: &str) {
        std::fs::rename(self.dir.path().join(from), self.dir.path().join(to))
            .expect("Failed to rename file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.read(false).expect("Failed to reload index");
        index.remove_path(Path::new(from)).expect("Failed to remove path");
        index.add_path(Path::new(to)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Content of `path` in the `HEAD` commit, if present there.
    pub fn head_file(&self, relative: &str) -> Option<String> {
        let tree = self
            .repo
            .head()
            .and_then(|h| h.peel_to_tree())
            .expect("Failed to resolve HEAD tree");
        let entry = tree.get_path(Path::new(relative)).ok()?;
        let blob = self
            .repo
            .find_blob(entry.id())
            .expect("Failed to read blob");
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }

    /// Content of `path` in the working tree.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).expect("Failed to read file")
    }

    /// Commit the current index. Returns the commit OID.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Messages of commits reachable from `HEAD`, newest first.
    pub fn log(&self) -> Vec<String> {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.map(|oid| {
            let oid = oid.expect("Failed to walk commits");
            let commit = self.repo.find_commit(oid).expect("Failed to find commit");
            commit.message().unwrap_or_default().trim_end().to_string()
        })
        .collect()
    }

    /// Paths changed by the commit at `HEAD`, relative to its parent.
    pub fn head_paths(&self) -> Vec<String> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        let parent_tree = head.parent(0).ok().and_then(|p| p.tree().ok());
        let tree = head.tree().expect("Failed to read HEAD tree");
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .expect("Failed to diff HEAD");
        diff.deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.to_string_lossy().into_owned()))
            .collect()
    }

    /// Paths with staged changes relative to `HEAD`.
    pub fn staged(&self) -> Vec<String> {
        let head_tree = self.repo.head().ok().and_then(|h| h.peel_to_tree().ok());
        let mut index = self.repo.index().expect("Failed to get index");
        // Pick up changes made by the git executable
        index.read(false).expect("Failed to reload index");
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .expect("Failed to diff index");
        diff.deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.to_string_lossy().into_owned()))
            .collect()
    }
}

/// A chat completions response body whose content is the given JSON text.
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content, "refusal": null },
            "finish_reason": "stop"
        }]
    })
}

/// A chat completions response carrying a commit message.
pub fn commit_message_body(message: &str) -> serde_json::Value {
    completion_body(&json!({ "commit_message": message }).to_string())
}
