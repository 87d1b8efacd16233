use std::sync::Mutex;

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::types::{ContentGenerator, InlineImage};
use crate::config::Settings;
use super::{map_send_error, LlmError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";

/// Google Gemini HTTP client (`models/{model}:generateContent`).
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey("GOOGLE_API_KEY"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client for `GOOGLE_API_KEY` / `GEMINI_MODEL`.
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let api_key = settings
            .google_api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey("GOOGLE_API_KEY"))?;
        Self::new(api_key, &settings.gemini_model, settings.http_timeout_secs)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Prompt text first, then the image, matching how the app has always
/// ordered multimodal requests.
fn build_request(prompt: &str, image: Option<&InlineImage>) -> GenerateContentRequest {
    let mut parts = vec![Part::Text { text: prompt.to_string() }];
    if let Some(image) = image {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type,
                data: base64::engine::general_purpose::STANDARD.encode(&image.data),
            },
        });
    }
    GenerateContentRequest {
        contents: vec![Content { role: "user", parts }],
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(LlmError::EmptyResponse(PROVIDER));
    }
    Ok(text)
}

impl ContentGenerator for GeminiClient {
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError> {
        let body = build_request(prompt, image);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
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
        candidate_text(&text)
    }
}

/// Mock generator for testing: returns a configured reply (or error) and
/// records each prompt and whether an image was attached.
pub struct MockContentGenerator {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl MockContentGenerator {
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

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ContentGenerator for MockContentGenerator {
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), image.is_some()));
        }
        self.reply.clone().map_err(LlmError::HttpClient)
    }
}
