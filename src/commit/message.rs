//! Commit message composition from a staged diff.

use tracing::debug;

use crate::error::SessionError;
use crate::llm::{CompletionModel, LlmError};

use super::splitter::TextSplitter;
use super::summarize::{SummaryChain, summarize};

/// Marker put in front of generated commit messages unless disabled.
pub const DEFAULT_COMMIT_PREFIX: &str = "🧞: ";

/// Printed when `commit` runs with nothing staged.
pub const NO_CHANGES_NOTICE: &str = "No changes detected. Stage files with `git add` first.";

const COMMIT_PROMPT: &str = "You are a version control system. Generate a commit message for the following changes. \
The commit message should be a short description of the changes. \
The commit message should be written in the imperative mood, i.e. as if you were giving a command. \
The first line should be no longer than 50 characters and should start with a capital letter. \
The following lines should be no longer than 72 characters.

Only focus on the changed lines. Do not include lines that were not changed.

Be direct, try to eliminate filler words and phrases in these sentences (examples: though, maybe, I think, kind of). \
Think like a journalist. Be concise. Be clear. Be consistent. Be professional. Be respectful.

Changes: {text}

Commit message:";

pub fn build_commit_prompt(summary: &str) -> String {
    COMMIT_PROMPT.replace("{text}", summary)
}

/// Turns a diff into a commit message: split, summarize, compose, prefix.
#[derive(Debug, Clone)]
pub struct CommitComposer {
    chain: SummaryChain,
    splitter: TextSplitter,
    prefix: Option<String>,
}

impl Default for CommitComposer {
    fn default() -> Self {
        Self {
            chain: SummaryChain::default(),
            splitter: TextSplitter::default(),
            prefix: Some(DEFAULT_COMMIT_PREFIX.to_string()),
        }
    }
}

impl CommitComposer {
    /// An empty prefix is the same as no prefix.
    pub fn new(chain: SummaryChain, prefix: Option<String>) -> Self {
        Self {
            chain,
            splitter: TextSplitter::default(),
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn chain(&self) -> SummaryChain {
        self.chain
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub async fn compose(
        &self,
        model: &mut dyn CompletionModel,
        diff: &str,
    ) -> Result<String, LlmError> {
        let chunks = self.splitter.split(diff);
        debug!(
            "Split {} char diff into {} chunks ({} chain)",
            diff.len(),
            chunks.len(),
            self.chain
        );

        let summary = summarize(model, self.chain, &chunks).await?;
        debug!("Change summary: {}", summary);

        let message = model.complete(&build_commit_prompt(&summary)).await?;
        let message = message.trim();

        Ok(match &self.prefix {
            Some(prefix) => format!("{prefix}{message}"),
            None => message.to_string(),
        })
    }
}

/// Build `git commit -m <message>` with the message quoted for `sh`.
pub fn commit_command(message: &str) -> Result<String, SessionError> {
    let quoted = shlex::try_quote(message).map_err(|e| SessionError::Quote(e.to_string()))?;
    Ok(format!("git commit -m {quoted}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::router::MockCompletionModel;
    use mockall::Sequence;

    #[test]
    fn test_commit_prompt_contains_rules_and_summary() {
        let prompt = build_commit_prompt("Added a README");
        assert!(prompt.contains("imperative mood"));
        assert!(prompt.contains("no longer than 50 characters"));
        assert!(prompt.contains("Changes: Added a README"));
        assert!(prompt.ends_with("Commit message:"));
    }

    #[tokio::test]
    async fn test_summary_runs_before_composer_and_prefix_applied() {
        let mut model = MockCompletionModel::new();
        let mut seq = Sequence::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.starts_with("Write a concise summary") && prompt.contains("+hello"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Adds a greeting file".to_string()));
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("Changes: Adds a greeting file"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("  Add greeting file\n".to_string()));

        let composer = CommitComposer::default();
        let message = composer
            .compose(&mut model, "diff --git a/hi b/hi\n+hello\n")
            .await
            .unwrap();
        assert_eq!(message, "🧞: Add greeting file");
    }

    #[tokio::test]
    async fn test_prefix_can_be_disabled() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .times(2)
            .returning(|_| Ok("Fix typo".to_string()));

        let composer = CommitComposer::new(SummaryChain::Stuff, Some(String::new()));
        assert_eq!(composer.prefix(), None);
        let message = composer.compose(&mut model, "+typo").await.unwrap();
        assert_eq!(message, "Fix typo");
    }

    #[tokio::test]
    async fn test_map_reduce_with_small_chunks() {
        let mut model = MockCompletionModel::new();
        // Three chunks, one combine step, one compose step.
        model
            .expect_complete()
            .times(5)
            .returning(|_| Ok("Update lines".to_string()));

        let composer = CommitComposer::new(SummaryChain::MapReduce, None)
            .with_splitter(TextSplitter::new("\n", 7, 0));
        let message = composer
            .compose(&mut model, "+aaaaa\n+bbbbb\n+ccccc")
            .await
            .unwrap();
        assert_eq!(message, "Update lines");
    }

    #[test]
    fn test_commit_command_quotes_message() {
        let command = commit_command("🧞: Don't break \"quotes\"").unwrap();
        assert!(command.starts_with("git commit -m "));
        let argv = shlex::split(&command).unwrap();
        assert_eq!(
            argv,
            vec!["git", "commit", "-m", "🧞: Don't break \"quotes\""]
        );
    }

    #[test]
    fn test_commit_command_rejects_nul() {
        assert!(matches!(
            commit_command("bad\0message"),
            Err(SessionError::Quote(_))
        ));
    }
}
