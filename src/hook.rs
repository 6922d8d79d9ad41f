//! Commit-message file rewriting for use as a git hook.
//!
//! Git hands the hook the path of the message file (usually
//! `.git/COMMIT_EDITMSG`). The first line is the message the user typed;
//! the rest is typically git's commented template and is kept as is.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::commit::{CommitComposer, DiffSource};
use crate::error::{ConfigError, HookError};
use crate::llm::CompletionModel;

/// Name used for the mode in configuration errors.
pub const MODE_ARG: &str = "--mode";

/// How the generated message is combined with the existing first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookMode {
    /// Keep the existing line and add the generated message below it.
    #[default]
    Append,
    /// Drop the existing line.
    Replace,
}

impl HookMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookMode::Append => "append",
            HookMode::Replace => "replace",
        }
    }
}

impl fmt::Display for HookMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookMode {
    type Err = ConfigError;

    /// Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(HookMode::Append),
            "replace" => Ok(HookMode::Replace),
            other => Err(ConfigError::InvalidValue {
                key: MODE_ARG,
                value: other.to_string(),
                expected: "append, replace",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Nothing staged; the file was not touched.
    NoChanges,
    Updated { message: String },
}

/// Splice `generated` into `contents` according to `mode`.
///
/// Only the first line changes. An empty existing line in append mode
/// yields the generated message alone.
pub fn splice_message(contents: &str, generated: &str, mode: HookMode) -> String {
    let (first, rest) = match contents.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (contents, ""),
    };
    let existing = first.trim_end_matches('\r');

    let new_first = match mode {
        HookMode::Append if !existing.is_empty() => format!("{existing}\n{generated}"),
        HookMode::Append | HookMode::Replace => generated.to_string(),
    };

    format!("{new_first}\n{rest}")
}

/// Rewrite `path` through a temp file in the same directory.
fn write_atomically(path: &Path, contents: &str) -> Result<(), HookError> {
    let write_err = |source| HookError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Regenerate the commit message in `path` from the staged diff.
///
/// `mode` is validated before the file or the diff is read.
pub async fn run_hook(
    path: &Path,
    mode: &str,
    diff_source: &dyn DiffSource,
    model: &mut dyn CompletionModel,
    composer: &CommitComposer,
) -> Result<HookOutcome, HookError> {
    let mode: HookMode = mode.parse()?;

    let contents = std::fs::read_to_string(path).map_err(|source| HookError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    let Some(diff) = diff_source.staged_diff()? else {
        return Ok(HookOutcome::NoChanges);
    };

    let message = composer.compose(model, &diff.text).await?;
    debug!("Writing commit message to {} ({} mode)", path.display(), mode);

    write_atomically(path, &splice_message(&contents, &message, mode))?;
    Ok(HookOutcome::Updated { message })
}
