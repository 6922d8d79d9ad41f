//! Retrying Claude calls and unwrapping the CLI's JSON envelope.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClaudeError;
use crate::llm::retry::retry_with_backoff;

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompt and return the raw stdout.
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError>;
}

/// Default executor that calls the real Claude CLI.
pub struct DefaultExecutor;

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt).await
    }
}

/// Generate a text completion with retry logic.
///
/// Makes up to 3 attempts with exponential backoff on failure.
pub async fn generate_with_retry(prompt: &str) -> Result<String, ClaudeError> {
    generate_with_executor(prompt, &DefaultExecutor).await
}

/// Same as [`generate_with_retry`] with a caller-supplied executor.
pub async fn generate_with_executor<E: ClaudeExecutor>(
    prompt: &str,
    executor: &E,
) -> Result<String, ClaudeError> {
    retry_with_backoff(
        || async {
            let response = executor.run(prompt).await?;
            parse_claude_response(&response)
        },
        |e| ClaudeError::RetriesExhausted(Box::new(e)),
    )
    .await
}

/// Claude CLI JSON envelope when using --output-format json.
#[derive(Deserialize)]
struct ClaudeCliResponse {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// Pull the answer text out of Claude's response.
///
/// Older CLI versions ignore `--output-format`, so anything that is not an
/// envelope is taken as the answer itself. A blank answer is an error.
fn parse_claude_response(response: &str) -> Result<String, ClaudeError> {
    let answer = match serde_json::from_str::<ClaudeCliResponse>(response) {
        Ok(envelope) if envelope.is_error => {
            return Err(ClaudeError::ExecutionFailed(envelope.result));
        }
        Ok(envelope) => envelope.result,
        Err(_) => response.to_string(),
    };

    if answer.trim().is_empty() {
        return Err(ClaudeError::EmptyResponse);
    }
    Ok(answer)
}
