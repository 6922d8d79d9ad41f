//! Staged diff collection using git2.
//!
//! Produces the same text as `git diff --staged`: the index compared
//! against HEAD, in unified patch format.

use std::path::PathBuf;

use git2::{Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::debug;

use crate::error::GitError;

/// The staged changes, ready to be summarized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
}

/// Where the commit pipeline gets its diff from.
pub trait DiffSource: Send + Sync {
    /// The staged diff, or `None` when nothing is staged.
    fn staged_diff(&self) -> Result<Option<StagedDiff>, GitError>;
}

/// Reads the staged diff of the repository containing `path`.
#[derive(Debug, Clone)]
pub struct RepoDiffSource {
    path: PathBuf,
}

impl RepoDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

}

impl DiffSource for RepoDiffSource {
    fn staged_diff(&self) -> Result<Option<StagedDiff>, GitError> {
        let repo = Repository::discover(&self.path).map_err(GitError::OpenRepository)?;
        collect_staged_diff(&repo)
    }
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits, so that everything in the
/// index shows up as added.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the staged diff (HEAD → index).
///
/// Returns `Ok(None)` when nothing is staged. Unstaged and untracked files
/// are ignored.
pub fn collect_staged_diff(repo: &Repository) -> Result<Option<StagedDiff>, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let files_changed = diff.deltas().len();
    if files_changed == 0 {
        return Ok(None);
    }

    let (text, additions, deletions) = render_patch(&diff)?;
    debug!(
        "Staged diff: {} files, {} additions, {} deletions",
        files_changed, additions, deletions
    );

    Ok(Some(StagedDiff {
        text,
        files_changed,
        additions,
        deletions,
    }))
}

/// Render a diff as unified patch text, counting added and removed lines.
fn render_patch(diff: &Diff<'_>) -> Result<(String, usize, usize), GitError> {
    let mut text = String::new();
    let mut additions = 0usize;
    let mut deletions = 0usize;

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        match origin {
            '+' => additions += 1,
            '-' => deletions += 1,
            _ => {}
        }

        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }

        text.push_str(&String::from_utf8_lossy(line.content()));

        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok((text, additions, deletions))
}
