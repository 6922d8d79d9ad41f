//! The interactive instruction → command → explain/execute loop.

use dialoguer::Input;
use tracing::debug;

use crate::commit::{CommitComposer, DiffSource, NO_CHANGES_NOTICE, commit_command};
use crate::error::SessionError;
use crate::exec::{ExecOutput, ShellRunner};
use crate::explain::explain;
use crate::llm::CompletionModel;
use crate::output::Reporter;
use crate::prompt::{
    ExplanationExample, TranslationExample, default_explanation_examples,
    default_translation_examples,
};
use crate::translate::translate;

/// Instruction that routes to the commit-message pipeline.
pub const COMMIT_INSTRUCTION: &str = "commit";

pub const ACTION_PROMPT: &str = "(E)xplain or e(X)ecute or (N)ew?";
pub const AFTER_EXPLAIN_PROMPT: &str = "e(X)ecute or (N)ew?";
pub const NEW_INSTRUCTION_PROMPT: &str = "Enter new instructions";

/// Source of interactive answers.
pub trait Prompter: Send {
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError>;
}

/// Reads answers from the terminal.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SessionError::Prompt(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Explain,
    Execute,
    New,
    Stop,
}

fn parse_action(answer: &str) -> Action {
    match answer.trim().to_ascii_lowercase().as_str() {
        "e" => Action::Explain,
        "x" => Action::Execute,
        "n" => Action::New,
        _ => Action::Stop,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub execute: bool,
    pub explain: bool,
    pub quiet: bool,
    pub just_print_commit_message: bool,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `commit` with nothing staged.
    NoChanges,
    MessagePrinted(String),
    CommandPrinted(String),
    Explained { command: String },
    Executed { command: String, output: ExecOutput },
    Dismissed { command: String },
}

enum Generated {
    Command(String),
    Done(SessionOutcome),
}

pub struct Session<'a> {
    model: &'a mut dyn CompletionModel,
    shell: &'a dyn ShellRunner,
    prompter: &'a mut dyn Prompter,
    diff_source: &'a dyn DiffSource,
    reporter: &'a mut Reporter,
    composer: CommitComposer,
    translations: Vec<TranslationExample>,
    explanations: Vec<ExplanationExample>,
}

impl<'a> Session<'a> {
    pub fn new(
        model: &'a mut dyn CompletionModel,
        shell: &'a dyn ShellRunner,
        prompter: &'a mut dyn Prompter,
        diff_source: &'a dyn DiffSource,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            model,
            shell,
            prompter,
            diff_source,
            reporter,
            composer: CommitComposer::default(),
            translations: default_translation_examples(),
            explanations: default_explanation_examples(),
        }
    }

    pub fn with_composer(mut self, composer: CommitComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_translation_examples(mut self, examples: Vec<TranslationExample>) -> Self {
        self.translations = examples;
        self
    }

    /// Handle `instruction`, then follow the user's choices until the
    /// session ends.
    ///
    /// Choosing New asks for a fresh instruction and starts over with
    /// `execute`, `explain` and `just_print_commit_message` cleared. The
    /// previous command is discarded.
    pub async fn run(
        &mut self,
        instruction: &str,
        mut options: SessionOptions,
    ) -> Result<SessionOutcome, SessionError> {
        let mut instruction = instruction.to_string();

        loop {
            let command = match self.generate(&instruction, options).await? {
                Generated::Command(command) => command,
                Generated::Done(outcome) => return Ok(outcome),
            };

            if options.quiet {
                self.reporter.result(&command).map_err(SessionError::Output)?;
                return Ok(SessionOutcome::CommandPrinted(command));
            }

            if options.explain {
                self.explain(&command).await?;
            }
            if options.execute {
                return self.execute(command).await;
            }
            if options.explain {
                return Ok(SessionOutcome::Explained { command });
            }

            match parse_action(&self.prompter.ask(ACTION_PROMPT)?) {
                Action::Explain => {
                    self.explain(&command).await?;
                    match parse_action(&self.prompter.ask(AFTER_EXPLAIN_PROMPT)?) {
                        Action::Execute => return self.execute(command).await,
                        Action::New => {}
                        Action::Explain | Action::Stop => {
                            return Ok(SessionOutcome::Explained { command });
                        }
                    }
                }
                Action::Execute => return self.execute(command).await,
                Action::New => {}
                Action::Stop => return Ok(SessionOutcome::Dismissed { command }),
            }

            debug!("Discarding '{}' for a new instruction", command);
            instruction = self.prompter.ask(NEW_INSTRUCTION_PROMPT)?;
            options.execute = false;
            options.explain = false;
            options.just_print_commit_message = false;
        }
    }

    async fn generate(
        &mut self,
        instruction: &str,
        options: SessionOptions,
    ) -> Result<Generated, SessionError> {
        if instruction.trim() != COMMIT_INSTRUCTION {
            let command = translate(&mut *self.model, &self.translations, instruction).await?;
            self.reporter
                .command("Generated git command:", &command)
                .map_err(SessionError::Output)?;
            return Ok(Generated::Command(command));
        }

        let Some(diff) = self.diff_source.staged_diff()? else {
            self.reporter
                .notice(NO_CHANGES_NOTICE)
                .map_err(SessionError::Output)?;
            return Ok(Generated::Done(SessionOutcome::NoChanges));
        };

        let message = self.composer.compose(&mut *self.model, &diff.text).await?;
        self.reporter
            .command("Generated commit message:", &message)
            .map_err(SessionError::Output)?;

        if options.just_print_commit_message {
            self.reporter.result(&message).map_err(SessionError::Output)?;
            return Ok(Generated::Done(SessionOutcome::MessagePrinted(message)));
        }

        let command = commit_command(&message)?;
        self.reporter
            .command("Generated commit command:", &command)
            .map_err(SessionError::Output)?;
        Ok(Generated::Command(command))
    }

    async fn explain(&mut self, command: &str) -> Result<(), SessionError> {
        let explanation = explain(&mut *self.model, &self.explanations, command).await?;
        self.reporter
            .explanation(&explanation)
            .map_err(SessionError::Output)
    }

    async fn execute(&mut self, command: String) -> Result<SessionOutcome, SessionError> {
        self.reporter
            .command("Running command:", &command)
            .map_err(SessionError::Output)?;
        let output = self.shell.run(&command).await?;
        self.reporter.relay(&output)?;
        Ok(SessionOutcome::Executed { command, output })
    }
}
