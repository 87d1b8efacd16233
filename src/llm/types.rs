use serde::{Deserialize, Serialize};

use super::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

/// Sampling knobs for a chat completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat-style LLM abstraction (allows mocking)
pub trait ChatCompletion {
    fn complete(
        &self,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<String, LlmError>;
}

/// An image passed alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Prompt-in, text-out LLM abstraction with optional image input (allows mocking)
pub trait ContentGenerator {
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError>;
}

impl InlineImage {
    /// Sniff the format from magic bytes. Only formats the Gemini API accepts
    /// are let through.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, LlmError> {
        let format = image::guess_format(&data)
            .map_err(|e| LlmError::UnsupportedImage(e.to_string()))?;
        let mime_type = match format {
            image::ImageFormat::Png => "image/png",
            image::ImageFormat::Jpeg => "image/jpeg",
            image::ImageFormat::WebP => "image/webp",
            other => {
                return Err(LlmError::UnsupportedImage(format!("{other:?}")));
            }
        };
        Ok(Self { mime_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn sniffs_png_and_jpeg() {
        assert_eq!(InlineImage::from_bytes(PNG_HEADER.to_vec()).unwrap().mime_type, "image/png");
        assert_eq!(InlineImage::from_bytes(JPEG_HEADER.to_vec()).unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn rejects_non_image_bytes() {
        let result = InlineImage::from_bytes(b"%PDF-1.7 not an image".to_vec());
        assert!(matches!(result, Err(LlmError::UnsupportedImage(_))));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
