//! Minimal chat-completions client for OpenAI-compatible endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OpenAiError;

use super::OpenAiSettings;

/// Maximum characters of an error body kept in `OpenAiError::Status`.
const MAX_ERROR_BODY: usize = 500;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    /// Build a client from settings.
    ///
    /// Fails with `MissingApiKey` when no key is configured, so callers can
    /// skip the retry loop for a problem retries cannot fix.
    pub fn new(settings: &OpenAiSettings) -> Result<Self, OpenAiError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(OpenAiError::MissingApiKey)?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(OpenAiError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a single user message at temperature 0 and return the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(OpenAiError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await.map_err(OpenAiError::Request)?;
        parse_chat_response(&body)
    }
}

/// Extract the first choice's content from a chat-completions body.
///
/// Missing, null and blank content are all `EmptyResponse`.
fn parse_chat_response(body: &str) -> Result<String, OpenAiError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| OpenAiError::InvalidResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(OpenAiError::EmptyResponse)
}
