//! Hosted LLM clients (Groq chat completions, Gemini generateContent) and
//! response cleanup.

pub mod cleanup;
pub mod gemini;
pub mod groq;
pub mod types;

pub use cleanup::*;
pub use gemini::*;
pub use groq::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{provider} is not reachable")]
    Connection { provider: &'static str },

    #[error("{provider} returned error (status {status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("{0} returned no content")]
    EmptyResponse(&'static str),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Unsupported image data: {0}")]
    UnsupportedImage(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(&'static str),
}

/// Map a reqwest send error the same way for every provider.
pub(crate) fn map_send_error(provider: &'static str, timeout_secs: u64, e: reqwest::Error) -> LlmError {
    if e.is_connect() {
        LlmError::Connection { provider }
    } else if e.is_timeout() {
        LlmError::HttpClient(format!("Request timed out after {timeout_secs}s"))
    } else {
        LlmError::HttpClient(e.to_string())
    }
}
