//! Built-in few-shot example tables and loading custom tables from disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::few_shot::Example;

/// An instruction paired with the git command that carries it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationExample {
    pub instruction: String,
    pub command: String,
}

impl TranslationExample {
    pub fn new(instruction: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            command: command.into(),
        }
    }
}

impl Example for TranslationExample {
    fn render(&self) -> String {
        format!("Instruction: {}\nCommand: {}", self.instruction, self.command)
    }
}

/// A command paired with a man-page style, per-token explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationExample {
    pub command: String,
    pub explanation: String,
}

impl ExplanationExample {
    pub fn new(command: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            explanation: explanation.into(),
        }
    }
}

impl Example for ExplanationExample {
    fn render(&self) -> String {
        format!("Command: {}\nExplanation: {}", self.command, self.explanation)
    }
}

/// The built-in instruction → command table.
pub fn default_translation_examples() -> Vec<TranslationExample> {
    vec![
        TranslationExample::new("Revert last 3 commits", "git reset --hard HEAD~3"),
        TranslationExample::new("list all branches", "git branch"),
        TranslationExample::new(
            "Create a new branch called 'feature'",
            "git branch feature",
        ),
        TranslationExample::new("Switch to the 'feature' branch", "git checkout feature"),
        TranslationExample::new(
            "Create a new branch called 'feature' and switch to it",
            "git checkout -b feature",
        ),
        TranslationExample::new(
            "Merge the 'feature' branch into the 'master' branch",
            "git checkout master && git merge feature",
        ),
        TranslationExample::new(
            "Merge the 'feature' branch into the 'master' branch without fast-forwarding",
            "git checkout master && git merge --no-ff feature",
        ),
        TranslationExample::new(
            "Interactively rebase the last 5 commits",
            "git rebase -i HEAD~5",
        ),
    ]
}

/// The built-in command → explanation table.
pub fn default_explanation_examples() -> Vec<ExplanationExample> {
    vec![
        ExplanationExample::new(
            "git rebase -i --autosquash HEAD~5",
            "git rebase -> Reapply commits on top of another base tip\n\
             -i, --interactive -> Make a list of the commits which are about to be rebased. \
             Let the user edit that list before rebasing.\n\
             --autosquash -> Automatically move commits that begin with squash!/fixup! \
             next to the commit they modify in the todo list.\n\
             HEAD~5 -> Rebase the last 5 commits",
        ),
        ExplanationExample::new(
            "git push origin master --force-with-lease",
            "git push -> Update remote refs along with associated objects\n\
             origin -> The remote repository\n\
             master -> The branch to push\n\
             --force-with-lease -> Overwrite the remote branch only if it still points \
             at the commit we last fetched. This prevents clobbering work pushed by others.",
        ),
        ExplanationExample::new(
            "git log --since=1.week --name-only --oneline -- test.json | grep test.json | wc -l",
            "git log -> Show commit logs\n\
             --since=1.week -> Show commits more recent than one week\n\
             --name-only -> Show only names of changed files\n\
             --oneline -> Show only the first line of each commit message\n\
             -- test.json -> Only commits that affect test.json\n\
             | -> Pipe the output of the previous command to the next command\n\
             grep test.json -> Only keep lines that contain test.json\n\
             wc -l -> Count the number of lines",
        ),
        ExplanationExample::new(
            "git log --graph --decorate --oneline --all -n 5",
            "git log -> Show commit logs\n\
             --graph -> Draw an ASCII graph of the branch and merge history beside the log output\n\
             --decorate -> Show the ref names of any commits that are shown\n\
             --oneline -> Show only the first line of each commit message\n\
             --all -> Show commits reachable from any ref, not only HEAD\n\
             -n 5 -> Show only the last 5 commits",
        ),
    ]
}

/// Load a translation table from a JSON array of `{instruction, command}`.
pub fn load_translation_examples(path: &Path) -> Result<Vec<TranslationExample>, ConfigError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ExamplesRead {
        path: display.clone(),
        source,
    })?;

    let examples: Vec<TranslationExample> =
        serde_json::from_str(&content).map_err(|source| ConfigError::ExamplesParse {
            path: display.clone(),
            source,
        })?;

    if examples.is_empty() {
        return Err(ConfigError::ExamplesEmpty(display));
    }

    Ok(examples)
}
