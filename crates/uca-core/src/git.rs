//! Git integration for reading earlier revisions of target files.
//!
//! Everything here shells out to the `git` binary found on `PATH`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, UcaError};
use crate::obs;

/// Revision compared against when none is given.
pub const DEFAULT_PREVIOUS_REV: &str = "HEAD~1";

/// Run `git` with `args` in `dir` and return its trimmed stdout.
///
/// Returns `UcaError::GitError` carrying git's stderr if the command exits
/// unsuccessfully, or if git cannot be started.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| UcaError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(UcaError::GitError(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Number of commits reachable from any ref.
pub fn rev_count(dir: &Path) -> Result<u64> {
    let count = run_git(dir, &["rev-list", "--count", "--all"])?;
    count
        .parse()
        .map_err(|_| UcaError::GitError(format!("unexpected rev-list output: {count:?}")))
}

/// Fail with `UcaError::NotEnoughHistory` unless the repository holds at
/// least `required` commits. Returns the commit count.
pub fn require_history(dir: &Path, required: u64) -> Result<u64> {
    let found = rev_count(dir)?;
    if found < required {
        return Err(UcaError::NotEnoughHistory { required, found });
    }
    Ok(found)
}

/// Root of the work tree containing `dir`.
pub fn top_level(dir: &Path) -> Result<PathBuf> {
    run_git(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// Check whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Content of `path` as of `rev`.
///
/// A file that did not exist at `rev` has no earlier content, so this
/// returns an empty string rather than an error.
pub fn previous_content(path: &Path, rev: &str) -> Result<String> {
    let absolute = absolute_path(path)?;
    let parent = absolute.parent().unwrap_or(Path::new("/"));
    let root = top_level(parent)?.canonicalize()?;

    let relative = absolute.strip_prefix(&root).map_err(|_| {
        UcaError::GitError(format!(
            "{} is outside the repository at {}",
            path.display(),
            root.display()
        ))
    })?;
    let spec = format!("{rev}:{}", relative.to_string_lossy().replace('\\', "/"));

    match run_git(&root, &["show", &spec]) {
        Ok(content) => Ok(content),
        Err(UcaError::GitError(msg)) if is_missing_in_rev(&msg) => {
            obs::emit_history_missing(path, rev);
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

fn is_missing_in_rev(stderr: &str) -> bool {
    stderr.contains("exists on disk, but not in") || stderr.contains("does not exist in")
}

/// Resolve symlinks in the parent directory, keeping the file name as is so
/// that paths deleted from the work tree can still be looked up.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        UcaError::GitError(format!("{} does not name a file", path.display()))
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.canonicalize()?,
        _ => std::env::current_dir()?,
    };
    Ok(parent.join(file_name))
}
