//! Provider selection and fallback orchestration.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::claude;
use crate::codex;
use crate::error::{ClaudeError, CodexError, OpenAiError};
use crate::openai::{self, OpenAiSettings};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    Claude,
    Codex,
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
            Provider::OpenAi => "OpenAI",
        }
    }

    /// Parse the lowercase identifier used in configuration.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "claude" => Some(Provider::Claude),
            "codex" => Some(Provider::Codex),
            "openai" => Some(Provider::OpenAi),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary + fallback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSelection {
    pub primary: Provider,
    pub fallback: Provider,
}

impl ProviderSelection {
    pub fn from_primary(primary: Provider) -> Self {
        let fallback = match primary {
            Provider::Claude => Provider::Codex,
            Provider::Codex => Provider::Claude,
            Provider::OpenAi => Provider::Claude,
        };
        Self { primary, fallback }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::from_primary(Provider::Claude)
    }
}

/// Provider-specific error wrapper.
#[derive(Debug)]
pub enum LlmProviderError {
    Claude(ClaudeError),
    Codex(CodexError),
    OpenAi(OpenAiError),
}

impl LlmProviderError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmProviderError::Claude(_) => Provider::Claude,
            LlmProviderError::Codex(_) => Provider::Codex,
            LlmProviderError::OpenAi(_) => Provider::OpenAi,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => summarize_claude_error(err),
            LlmProviderError::Codex(err) => summarize_codex_error(err),
            LlmProviderError::OpenAi(err) => summarize_openai_error(err),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => err.to_string(),
            LlmProviderError::Codex(err) => err.to_string(),
            LlmProviderError::OpenAi(err) => err.to_string(),
        }
    }
}

impl fmt::Display for LlmProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmProviderError {}

impl From<ClaudeError> for LlmProviderError {
    fn from(err: ClaudeError) -> Self {
        LlmProviderError::Claude(err)
    }
}

impl From<CodexError> for LlmProviderError {
    fn from(err: CodexError) -> Self {
        LlmProviderError::Codex(err)
    }
}

impl From<OpenAiError> for LlmProviderError {
    fn from(err: OpenAiError) -> Self {
        LlmProviderError::OpenAi(err)
    }
}

/// LLM orchestration error.
#[derive(Debug)]
pub enum LlmError {
    AllProvidersFailed {
        primary: Provider,
        primary_error: LlmProviderError,
        fallback: Provider,
        fallback_error: LlmProviderError,
    },
}

impl LlmError {
    pub fn summary(&self) -> String {
        match self {
            LlmError::AllProvidersFailed {
                primary,
                primary_error,
                fallback,
                fallback_error,
            } => format!(
                "Both LLM providers failed. {} error: {}. {} error: {}.",
                primary,
                primary_error.summary(),
                fallback,
                fallback_error.summary()
            ),
        }
    }

    pub fn detailed(&self) -> String {
        match self {
            LlmError::AllProvidersFailed {
                primary,
                primary_error,
                fallback,
                fallback_error,
            } => format!(
                "Both LLM providers failed. {} error: {}. {} error: {}.",
                primary,
                primary_error.detail(),
                fallback,
                fallback_error.detail()
            ),
        }
    }

    pub fn primary_error(&self) -> &LlmProviderError {
        match self {
            LlmError::AllProvidersFailed { primary_error, .. } => primary_error,
        }
    }

    pub fn fallback_error(&self) -> &LlmProviderError {
        match self {
            LlmError::AllProvidersFailed { fallback_error, .. } => fallback_error,
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmError {}

/// Successful generation with metadata.
#[derive(Debug)]
pub struct LlmCompletion {
    pub output: String,
    pub provider: Provider,
    pub primary_error: Option<LlmProviderError>,
}

/// Anything that can turn a prompt into a completion.
///
/// The translator, explainer and commit composer only depend on this, so
/// tests can drive them with scripted responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send {
    async fn complete(&mut self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
pub(crate) trait ProviderRunner: Send + Sync {
    async fn run(&self, provider: Provider, prompt: &str) -> Result<String, LlmProviderError>;
    async fn available(&self, provider: Provider) -> bool;
}

struct DefaultRunner {
    openai: OpenAiSettings,
}

#[async_trait]
impl ProviderRunner for DefaultRunner {
    async fn run(&self, provider: Provider, prompt: &str) -> Result<String, LlmProviderError> {
        match provider {
            Provider::Claude => claude::generate_with_retry(prompt)
                .await
                .map_err(LlmProviderError::from),
            Provider::Codex => codex::generate_with_retry(prompt)
                .await
                .map_err(LlmProviderError::from),
            Provider::OpenAi => openai::generate_with_retry(&self.openai, prompt)
                .await
                .map_err(LlmProviderError::from),
        }
    }

    async fn available(&self, provider: Provider) -> bool {
        match provider {
            Provider::Claude => claude::check_claude_installed().await.is_ok(),
            Provider::Codex => codex::check_codex_installed().await.is_ok(),
            Provider::OpenAi => self.openai.api_key.is_some(),
        }
    }
}

/// Provider router with fallback and stickiness.
pub struct LlmRouter {
    primary: Provider,
    fallback: Provider,
    runner: Box<dyn ProviderRunner>,
}

impl LlmRouter {
    pub fn new(selection: ProviderSelection, openai: OpenAiSettings) -> Self {
        Self::with_runner(selection, Box::new(DefaultRunner { openai }))
    }

    pub(crate) fn with_runner(selection: ProviderSelection, runner: Box<dyn ProviderRunner>) -> Self {
        Self {
            primary: selection.primary,
            fallback: selection.fallback,
            runner,
        }
    }

    pub fn primary(&self) -> Provider {
        self.primary
    }

    pub fn fallback(&self) -> Provider {
        self.fallback
    }

    /// Report which configured providers do not look usable.
    ///
    /// Purely advisory: nothing is aborted here, and a missing provider
    /// only surfaces as an error once a prompt is actually sent to it.
    pub async fn unavailable_providers(&self) -> Vec<Provider> {
        let mut missing = Vec::new();
        for provider in [self.primary, self.fallback] {
            if !self.runner.available(provider).await {
                missing.push(provider);
            }
        }
        missing
    }

    pub async fn generate(&mut self, prompt: &str) -> Result<LlmCompletion, LlmError> {
        let primary = self.primary;
        let fallback = self.fallback;

        debug!("Sending {} char prompt to {}", prompt.len(), primary);

        match self.runner.run(primary, prompt).await {
            Ok(output) => Ok(LlmCompletion {
                output,
                provider: primary,
                primary_error: None,
            }),
            Err(primary_error) => match self.runner.run(fallback, prompt).await {
                Ok(output) => {
                    self.primary = fallback;
                    self.fallback = primary;
                    Ok(LlmCompletion {
                        output,
                        provider: fallback,
                        primary_error: Some(primary_error),
                    })
                }
                Err(fallback_error) => Err(LlmError::AllProvidersFailed {
                    primary,
                    primary_error,
                    fallback,
                    fallback_error,
                }),
            },
        }
    }
}

#[async_trait]
impl CompletionModel for LlmRouter {
    async fn complete(&mut self, prompt: &str) -> Result<String, LlmError> {
        let completion = self.generate(prompt).await?;
        if let Some(err) = &completion.primary_error {
            warn!(
                "{} failed ({}); answered by {} instead",
                err.provider(),
                err.summary(),
                completion.provider
            );
        }
        Ok(completion.output)
    }
}

fn summarize_claude_error(err: &ClaudeError) -> String {
    match err {
        ClaudeError::NotInstalled => "Claude CLI not found".to_string(),
        ClaudeError::ExecutionFailed(_) => "Claude CLI reported an error".to_string(),
        ClaudeError::EmptyResponse => "Claude returned nothing".to_string(),
        ClaudeError::SpawnFailed(_) => "Failed to start Claude CLI".to_string(),
        ClaudeError::Timeout(secs) => format!("Claude timed out after {}s", secs),
        ClaudeError::NonZeroExit { code, .. } => format!("Claude CLI exited with code {}", code),
        ClaudeError::RetriesExhausted(_) => "Claude failed after retries".to_string(),
    }
}

fn summarize_codex_error(err: &CodexError) -> String {
    match err {
        CodexError::NotInstalled => "Codex CLI not found".to_string(),
        CodexError::EmptyResponse => "Codex returned nothing".to_string(),
        CodexError::SpawnFailed(_) => "Failed to start Codex CLI".to_string(),
        CodexError::Timeout(secs) => format!("Codex timed out after {}s", secs),
        CodexError::NonZeroExit { code, .. } => format!("Codex CLI exited with code {}", code),
        CodexError::RetriesExhausted(_) => "Codex failed after retries".to_string(),
    }
}

fn summarize_openai_error(err: &OpenAiError) -> String {
    match err {
        OpenAiError::MissingApiKey => "OPENAI_API_KEY not set".to_string(),
        OpenAiError::ClientBuild(_) => "Failed to build HTTP client".to_string(),
        OpenAiError::Request(_) => "Request to OpenAI failed".to_string(),
        OpenAiError::Status { status, .. } => format!("OpenAI returned HTTP {}", status),
        OpenAiError::InvalidResponse(_) => "OpenAI returned an unreadable response".to_string(),
        OpenAiError::EmptyResponse => "OpenAI returned nothing".to_string(),
        OpenAiError::RetriesExhausted(_) => "OpenAI failed after retries".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct FakeRunner {
        claude_ok: bool,
        codex_ok: bool,
        calls: Arc<Mutex<Vec<Provider>>>,
    }

    impl FakeRunner {
        fn new(claude_ok: bool, codex_ok: bool) -> Self {
            Self {
                claude_ok,
                codex_ok,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ProviderRunner for FakeRunner {
        async fn run(&self, provider: Provider, _prompt: &str) -> Result<String, LlmProviderError> {
            self.calls.lock().unwrap().push(provider);
            match provider {
                Provider::Claude if self.claude_ok => Ok("git status".to_string()),
                Provider::Codex if self.codex_ok => Ok("git branch".to_string()),
                Provider::Claude => Err(LlmProviderError::Claude(ClaudeError::NotInstalled)),
                Provider::Codex => Err(LlmProviderError::Codex(CodexError::NotInstalled)),
                Provider::OpenAi => Err(LlmProviderError::OpenAi(OpenAiError::MissingApiKey)),
            }
        }

        async fn available(&self, provider: Provider) -> bool {
            match provider {
                Provider::Claude => self.claude_ok,
                Provider::Codex => self.codex_ok,
                Provider::OpenAi => false,
            }
        }
    }

    #[test]
    fn default_selection_is_claude_then_codex() {
        let selection = ProviderSelection::default();
        assert_eq!(selection.primary, Provider::Claude);
        assert_eq!(selection.fallback, Provider::Codex);
    }

    #[test]
    fn codex_selection_sets_fallback_to_claude() {
        let selection = ProviderSelection::from_primary(Provider::Codex);
        assert_eq!(selection.primary, Provider::Codex);
        assert_eq!(selection.fallback, Provider::Claude);
    }

    #[test]
    fn openai_selection_falls_back_to_claude() {
        let selection = ProviderSelection::from_primary(Provider::OpenAi);
        assert_eq!(selection.primary, Provider::OpenAi);
        assert_eq!(selection.fallback, Provider::Claude);
    }

    #[test]
    fn provider_ids_parse_case_insensitively() {
        assert_eq!(Provider::from_id("OpenAI"), Some(Provider::OpenAi));
        assert_eq!(Provider::from_id(" codex "), Some(Provider::Codex));
        assert_eq!(Provider::from_id("gemini"), None);
    }

    #[tokio::test]
    async fn generate_succeeds_on_primary() {
        let runner = FakeRunner::new(true, true);
        let calls = runner.calls.clone();
        let mut router = LlmRouter::with_runner(ProviderSelection::default(), Box::new(runner));

        let completion = router.generate("test").await.unwrap();
        assert_eq!(completion.provider, Provider::Claude);
        assert_eq!(completion.output, "git status");
        assert!(completion.primary_error.is_none());
        assert_eq!(*calls.lock().unwrap(), vec![Provider::Claude]);
    }

    #[tokio::test]
    async fn router_swaps_primary_after_fallback_success() {
        let runner = FakeRunner::new(false, true);
        let calls = runner.calls.clone();
        let mut router = LlmRouter::with_runner(ProviderSelection::default(), Box::new(runner));

        let completion = router.generate("test").await.unwrap();
        assert_eq!(completion.provider, Provider::Codex);
        assert!(completion.primary_error.is_some());
        assert_eq!(router.primary(), Provider::Codex);
        assert_eq!(router.fallback(), Provider::Claude);

        // Second call goes straight to the sticky provider.
        router.generate("again").await.unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Provider::Claude, Provider::Codex, Provider::Codex]
        );
    }

    #[tokio::test]
    async fn generate_fails_when_both_fail() {
        let mut router = LlmRouter::with_runner(
            ProviderSelection::default(),
            Box::new(FakeRunner::new(false, false)),
        );

        let err = router.generate("test").await.unwrap_err();
        assert_eq!(err.primary_error().provider(), Provider::Claude);
        assert_eq!(err.fallback_error().provider(), Provider::Codex);
        assert!(err.summary().contains("Claude CLI not found"));
        assert!(err.summary().contains("Codex CLI not found"));
        assert!(err.detailed().contains("npm install"));
    }

    #[tokio::test]
    async fn complete_returns_fallback_output() {
        let mut router = LlmRouter::with_runner(
            ProviderSelection::default(),
            Box::new(FakeRunner::new(false, true)),
        );

        let output = router.complete("list branches").await.unwrap();
        assert_eq!(output, "git branch");
    }

    #[tokio::test]
    async fn unavailable_providers_lists_missing() {
        let router = LlmRouter::with_runner(
            ProviderSelection::default(),
            Box::new(FakeRunner::new(true, false)),
        );
        assert_eq!(router.unavailable_providers().await, vec![Provider::Codex]);
    }
}
