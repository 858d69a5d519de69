//! Recursive mode: one message per staged file, then user selection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::console::Console;
use crate::error::RunError;
use crate::git::GitBackend;
use crate::llm::MessageGenerator;
use crate::workflow::Outcome;
use crate::workflow::selection::{parse_selection, selected_index};

/// Prompt shown before reading the selection line.
pub const SELECTION_PROMPT: &str =
    "Enter the numbers of commits you want to keep (comma-separated, e.g., '1,2,3')";

/// Generated message (or the error that prevented it) for one staged file.
#[derive(Debug)]
pub struct CommitResult {
    pub path: String,
    pub message: Result<String, RunError>,
}

impl CommitResult {
    /// The numbered line shown to the user; `number` is 1-based.
    pub fn display_line(&self, number: usize) -> String {
        match &self.message {
            Ok(message) => format!("{}. {}: {}", number, self.path, message),
            Err(e) => format!("{}. {}: Error - {}", number, self.path, e),
        }
    }
}

/// Generate messages for every staged file and commit the ones the user picks.
///
/// Only failing to list or stage files ends the run early. Per-file diff and
/// generation failures stay in that file's [`CommitResult`].
pub async fn run_recursive<C: Console>(
    git: Arc<dyn GitBackend>,
    generator: Arc<dyn MessageGenerator>,
    console: &mut C,
) -> Result<Outcome, RunError> {
    let mut files = git.staged_files().await?;

    if files.is_empty() {
        if !console.confirm("No staged files found. Do you want to stage all files?") {
            return Err(RunError::NothingStaged);
        }
        git.stage_all().await?;
        files = git.staged_files().await?;
        if files.is_empty() {
            return Err(RunError::NothingStaged);
        }
    }

    let results = generate_all(Arc::clone(&git), generator, files).await;

    for (idx, result) in results.iter().enumerate() {
        console.println(&result.display_line(idx + 1));
    }
    console.println("");

    let input = console.read_line(SELECTION_PROMPT).unwrap_or_default();
    let selection = parse_selection(&input);
    let committed = commit_selected(git.as_ref(), &results, &selection, console).await;

    Ok(Outcome::Selected { committed })
}

/// Diff and generate a message for each file concurrently.
///
/// Results come back in the order of `files`, one per file.
pub async fn generate_all(
    git: Arc<dyn GitBackend>,
    generator: Arc<dyn MessageGenerator>,
    files: Vec<String>,
) -> Vec<CommitResult> {
    let handles: Vec<_> = files
        .iter()
        .map(|path| {
            let git = Arc::clone(&git);
            let generator = Arc::clone(&generator);
            let path = path.clone();
            tokio::spawn(async move {
                message_for_file(git.as_ref(), generator.as_ref(), &path).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(files.len());
    for (path, handle) in files.into_iter().zip(handles) {
        let message = match handle.await {
            Ok(message) => message,
            Err(e) => Err(RunError::TaskFailed(e.to_string())),
        };
        if let Err(ref e) = message {
            warn!("No commit message for {}: {}", path, e);
        }
        results.push(CommitResult { path, message });
    }
    results
}

async fn message_for_file(
    git: &dyn GitBackend,
    generator: &dyn MessageGenerator,
    path: &str,
) -> Result<String, RunError> {
    let diff = git.diff(path).await?;
    if diff.trim().is_empty() {
        return Err(RunError::EmptyDiff(path.to_string()));
    }
    Ok(generator.generate(&diff).await?)
}

/// Commit each selected file with its own message, in selection order.
///
/// Out-of-range numbers are ignored. Repeated numbers are committed once.
/// Returns how many commits succeeded.
async fn commit_selected<C: Console>(
    git: &dyn GitBackend,
    results: &[CommitResult],
    selection: &[i64],
    console: &mut C,
) -> usize {
    let mut seen = HashSet::new();
    let mut committed = 0;

    for &number in selection {
        let Some(idx) = selected_index(number, results.len()) else {
            continue;
        };
        if !seen.insert(idx) {
            continue;
        }

        let result = &results[idx];
        let Ok(message) = &result.message else {
            console.println(&format!(
                "Skipping {}: no commit message was generated",
                result.path
            ));
            continue;
        };

        match git.commit_paths(message, std::slice::from_ref(&result.path)).await {
            Ok(()) => {
                info!("Committed {}", result.path);
                console.println(&format!("Successfully committed {}", result.path));
                committed += 1;
            }
            Err(e) => console.println(&format!("Failed to commit {}: {}", result.path, e)),
        }
    }

    committed
}
