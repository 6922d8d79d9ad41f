//! OpenAI-compatible HTTP backend.

pub mod client;

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::OpenAiError;
use crate::llm::retry::retry_with_backoff;

pub use client::OpenAiClient;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";

/// Default request timeout (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
const MODEL_ENV_VAR: &str = "GIT_GENIE_OPENAI_MODEL";
const TIMEOUT_ENV_VAR: &str = "GIT_GENIE_OPENAI_TIMEOUT";

/// Connection settings for the OpenAI backend.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OpenAiSettings {
    /// Read settings from the environment, keeping defaults for unset values.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(key) = non_empty_var(API_KEY_ENV_VAR) {
            settings.api_key = Some(key);
        }
        if let Some(url) = non_empty_var(BASE_URL_ENV_VAR) {
            settings.base_url = url;
        }
        if let Some(model) = non_empty_var(MODEL_ENV_VAR) {
            settings.model = model;
        }
        if let Some(raw) = non_empty_var(TIMEOUT_ENV_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) => settings.timeout = Duration::from_secs(secs),
                Err(_) => warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, raw, DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        settings
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Generate a text completion with retry logic.
///
/// A missing API key fails immediately; everything else gets up to 3
/// attempts with exponential backoff.
pub async fn generate_with_retry(
    settings: &OpenAiSettings,
    prompt: &str,
) -> Result<String, OpenAiError> {
    let client = OpenAiClient::new(settings)?;
    retry_with_backoff(
        || client.complete(prompt),
        |e| OpenAiError::RetriesExhausted(Box::new(e)),
    )
    .await
}
