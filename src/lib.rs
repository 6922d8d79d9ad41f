//! git-genie - turn plain-English instructions into git commands.
//!
//! # Overview
//!
//! git-genie sends an instruction plus a table of examples to an LLM and gets
//! back a single git command, which it can explain or run. The instruction
//! `commit` instead summarizes the staged diff and writes a commit message.
//! The same message generator backs the `git-genie-hook` binary, which
//! rewrites a commit-message file in place.
//!
//! LLM calls go through the Claude CLI, the Codex CLI or an OpenAI-compatible
//! HTTP API, with retries and fallback to a second provider.

pub mod claude;
pub mod codex;
pub mod commit;
pub mod config;
pub mod error;
pub mod exec;
pub mod explain;
pub mod hook;
pub mod llm;
pub mod logging;
pub mod openai;
pub mod output;
pub mod prompt;
pub mod session;
pub mod translate;

// Re-export commonly used types
pub use commit::{CommitComposer, DiffSource, RepoDiffSource, StagedDiff, SummaryChain};
pub use config::GenieConfig;
pub use error::{
    ClaudeError, CodexError, ConfigError, ExecError, GitError, HookError, OpenAiError,
    SessionError,
};
pub use exec::{ExecOutput, ShellRunner, SystemShell};
pub use hook::{HookMode, HookOutcome, run_hook};
pub use llm::{CompletionModel, LlmError, LlmRouter, Provider, ProviderSelection};
pub use output::Reporter;
pub use session::{DialoguerPrompter, Prompter, Session, SessionOptions, SessionOutcome};
