use serde_json::Value;

use super::prompt::{build_report_chat_prompt, ensure_json_instruction, ANALYSIS_PROMPT, VALIDATION_PROMPT};
use super::types::ReportAnalysis;
use crate::llm::{parse_json_response, ContentGenerator, InlineImage, LlmError};

/// Gemini-backed report operations.
pub struct ReportService<G: ContentGenerator> {
    generator: G,
}

impl<G: ContentGenerator> ReportService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Generate and parse a JSON reply, tolerating a markdown fence.
    pub fn generate_json(&self, prompt: &str) -> Result<Value, LlmError> {
        let prompt = ensure_json_instruction(prompt);
        let reply = self.generator.generate(&prompt, None).inspect_err(|e| {
            tracing::error!(error = %e, "Gemini JSON generation failed");
        })?;
        parse_json_response(&reply).inspect_err(|e| {
            tracing::error!(error = %e, "Gemini JSON generation returned unparseable output");
        })
    }

    pub fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.generator.generate(prompt, None).inspect_err(|e| {
            tracing::error!(error = %e, "Gemini text generation failed");
        })
    }

    /// Whether the image looks like a lab report or health document.
    ///
    /// Fails closed: unreadable images and model errors return `false`.
    pub fn validate_medical_report(&self, image_bytes: &[u8]) -> bool {
        let result = InlineImage::from_bytes(image_bytes.to_vec())
            .and_then(|image| self.generator.generate(VALIDATION_PROMPT, Some(&image)));
        match result {
            Ok(answer) => {
                let answer = answer.trim().to_uppercase();
                tracing::debug!(answer = %answer, "Medical validation");
                answer.contains("YES")
            }
            Err(e) => {
                tracing::error!(error = %e, "Medical validation failed");
                false
            }
        }
    }

    /// Extract structured report data from a lab-report image.
    pub fn analyze_medical_report(&self, image_bytes: &[u8]) -> Result<ReportAnalysis, LlmError> {
        let image = InlineImage::from_bytes(image_bytes.to_vec())?;
        let result = self
            .generator
            .generate(ANALYSIS_PROMPT, Some(&image))
            .and_then(|reply| parse_json_response(&reply))
            .and_then(|value| ReportAnalysis::from_json(&value));

        if let Ok(analysis) = &result {
            tracing::info!(
                report_type = ?analysis.report_type,
                parameters = analysis.parameters.len(),
                "Report analysis complete"
            );
        }
        result.inspect_err(|e| tracing::error!(error = %e, "Gemini analysis failed"))
    }

    pub fn chat_with_report(&self, report_context: &str, question: &str) -> Result<String, LlmError> {
        let prompt = build_report_chat_prompt(report_context, question);
        self.generator.generate(&prompt, None).inspect_err(|e| {
            tracing::error!(error = %e, "Gemini chat failed");
        })
    }
}
