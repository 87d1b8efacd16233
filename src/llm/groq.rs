use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::types::{ChatCompletion, ChatMessage, GenerationOptions};
use crate::config::Settings;
use super::{map_send_error, LlmError};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const PROVIDER: &str = "Groq";

/// Groq HTTP client (OpenAI-compatible chat completions).
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GroqClient {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(GROQ_BASE_URL, api_key, model, timeout_secs)
    }

    /// Client for `GROQ_API_KEY` / `GROQ_MODEL`.
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let api_key = settings
            .groq_api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey("GROQ_API_KEY"))?;
        Self::new(api_key, &settings.groq_model, settings.http_timeout_secs)
    }

    /// Point at another OpenAI-compatible endpoint.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey("GROQ_API_KEY"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// First choice's content, or `EmptyResponse`.
fn first_choice_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyResponse(PROVIDER))
}

impl ChatCompletion for GroqClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| map_send_error(PROVIDER, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
        first_choice_content(&text)
    }
}

/// Mock chat client for testing: returns a configured reply (or error) and
/// records the messages it was sent.
pub struct MockChatClient {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Messages of every call so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ChatCompletion for MockChatClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        self.reply.clone().map_err(LlmError::HttpClient)
    }
}
