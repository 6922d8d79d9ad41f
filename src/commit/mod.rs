//! Commit messages generated from the staged diff.

pub mod diff;
pub mod message;
pub mod splitter;
pub mod summarize;

pub use diff::{DiffSource, RepoDiffSource, StagedDiff, collect_staged_diff};
pub use message::{
    CommitComposer, DEFAULT_COMMIT_PREFIX, NO_CHANGES_NOTICE, build_commit_prompt, commit_command,
};
pub use splitter::TextSplitter;
pub use summarize::{SummaryChain, summarize};
