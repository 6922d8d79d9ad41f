//! Error types for git-genie modules using thiserror.

use thiserror::Error;

/// Errors from reading the repository state.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),
}

/// Errors from Claude CLI operations.
#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Claude Code CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Claude returned an empty response")]
    EmptyResponse,

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Claude CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<ClaudeError>),
}

/// Errors from Codex CLI operations.
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(
        "Codex CLI not found. Install with: npm install -g @openai/codex (then run `codex` or set CODEX_API_KEY)"
    )]
    NotInstalled,

    #[error("Codex returned an empty response")]
    EmptyResponse,

    #[error("Failed to spawn Codex process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Codex process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Codex CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<CodexError>),
}

/// Errors from the OpenAI-compatible HTTP backend.
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("OPENAI_API_KEY is not set. Export it or add it to a .env file")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to OpenAI failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("OpenAI returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OpenAI response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("OpenAI returned an empty response")]
    EmptyResponse,

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<OpenAiError>),
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}. Expected one of: {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to read examples file {path}: {source}")]
    ExamplesRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse examples file {path}: {source}")]
    ExamplesParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Examples file {0} contains no examples")]
    ExamplesEmpty(String),
}

/// Errors from running a generated command.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to spawn shell for '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to relay command output: {0}")]
    Relay(#[source] std::io::Error),
}

/// Errors from the pre-commit hook adapter.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read commit message file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write commit message file {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to generate commit message: {0}")]
    Llm(#[from] crate::llm::LlmError),
}

/// Errors from the interactive session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("{}", .0.detailed())]
    Llm(#[from] crate::llm::LlmError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("Failed to read input: {0}")]
    Prompt(String),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("Commit message cannot be quoted for the shell: {0}")]
    Quote(String),
}
