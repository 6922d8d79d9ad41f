//! Exponential backoff retry logic for Codex CLI.

use async_trait::async_trait;

use crate::error::CodexError;
use crate::llm::retry::retry_with_backoff;

use super::subprocess::run_codex;

/// Trait for executing Codex CLI commands.
///
/// This abstraction allows mocking the Codex subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    /// Run Codex with the given prompt and return its final message.
    async fn run(&self, prompt: &str) -> Result<String, CodexError>;
}

/// Default executor that calls the real Codex CLI.
pub struct DefaultExecutor;

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, CodexError> {
        run_codex(prompt).await
    }
}

/// Generate a text completion with retry logic.
///
/// Makes up to 3 attempts with exponential backoff on failure.
pub async fn generate_with_retry(prompt: &str) -> Result<String, CodexError> {
    generate_with_executor(prompt, &DefaultExecutor).await
}

/// Same as [`generate_with_retry`] with a caller-supplied executor.
pub async fn generate_with_executor<E: CodexExecutor>(
    prompt: &str,
    executor: &E,
) -> Result<String, CodexError> {
    retry_with_backoff(
        || async { executor.run(prompt).await },
        |e| CodexError::RetriesExhausted(Box::new(e)),
    )
    .await
}
