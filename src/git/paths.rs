//! Resolution of user-supplied file arguments to repository-relative paths.

use std::path::{Component, Path};

/// Resolve `input` to a `/`-separated path relative to the repository root.
///
/// `prefix` is the working directory relative to `root` as reported by
/// `git rev-parse --show-prefix`. Relative inputs are joined onto the prefix;
/// absolute inputs must live under `root`. `.` and `..` components are
/// collapsed lexically.
///
/// Returns `None` when the path escapes the repository or names the root itself.
pub fn resolve_repo_path(root: &Path, prefix: &str, input: &str) -> Option<String> {
    let input_path = Path::new(input);

    let mut parts: Vec<String> = Vec::new();
    let relative = if input_path.is_absolute() {
        input_path.strip_prefix(root).ok()?
    } else {
        for segment in prefix.split('/').filter(|s| !s.is_empty()) {
            parts.push(segment.to_string());
        }
        input_path
    };

    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join("/"))
}
