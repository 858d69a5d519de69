//! Single-file mode: one file, one message, one confirmation.

use tracing::info;

use crate::console::Console;
use crate::error::RunError;
use crate::git::{GitBackend, resolve_repo_path};
use crate::llm::MessageGenerator;
use crate::workflow::{Outcome, RepoContext};

/// Generate a commit message for `file` and commit it if the user agrees.
///
/// Declining to stage an unstaged file is an error; declining the commit
/// itself is a successful no-op.
pub async fn run_single<C: Console>(
    repo: &RepoContext,
    file: &str,
    git: &dyn GitBackend,
    generator: &dyn MessageGenerator,
    console: &mut C,
) -> Result<Outcome, RunError> {
    let path = resolve_repo_path(&repo.root, &repo.prefix, file)
        .ok_or_else(|| RunError::OutsideRepository(file.to_string()))?;

    if !git.is_staged(&path).await? {
        if !console.confirm("File is not staged. Do you want to stage it?") {
            return Err(RunError::StagingDeclined);
        }
        git.stage(&path).await?;
    }

    let diff = git.diff(&path).await?;
    if diff.trim().is_empty() {
        return Err(RunError::EmptyDiff(path));
    }

    let message = generator.generate(&diff).await?;
    console.println(&format!("Commit Message: {}", message));

    if !console.confirm("Do you want to commit the message?") {
        console.println("Sure, I'll not commit the message");
        return Ok(Outcome::Declined);
    }

    git.commit(&message).await?;
    info!("Committed {}", path);
    Ok(Outcome::Committed)
}
