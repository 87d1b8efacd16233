use super::context::{build_context_json, ParameterExplanation, ReportParameter, ReportRecord};
use super::prompt::{build_chat_messages, CHAT_OPTIONS};
use super::safety::{blocked_phrase, REFUSAL_RESPONSE};
use crate::llm::{tighten_bold_markers, ChatCompletion};

pub const UNAVAILABLE_RESPONSE: &str =
    "I'm having trouble connecting to my knowledge base right now. Please try again later.";

/// Report Q&A. Never fails: blocked questions get a refusal and any model
/// or serialization error gets a fixed apology.
pub struct ChatbotService<C: ChatCompletion> {
    client: C,
}

impl<C: ChatCompletion> ChatbotService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn generate_response(
        &self,
        question: &str,
        report: &ReportRecord,
        parameters: &[ReportParameter],
        explanations: &[ParameterExplanation],
    ) -> String {
        if let Some(phrase) = blocked_phrase(question) {
            tracing::info!(phrase, "Chatbot question refused by keyword pre-check");
            return REFUSAL_RESPONSE.to_string();
        }

        let context = match build_context_json(report, parameters, explanations) {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(error = %e, "Chatbot context serialization failed");
                return UNAVAILABLE_RESPONSE.to_string();
            }
        };

        let messages = build_chat_messages(&context, question);
        match self.client.complete(&messages, &CHAT_OPTIONS) {
            Ok(reply) => tighten_bold_markers(&reply),
            Err(e) => {
                tracing::error!(error = %e, "Chatbot Groq call failed");
                UNAVAILABLE_RESPONSE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockChatClient;

    fn report() -> ReportRecord {
        ReportRecord {
            report_type: Some("Lipid Profile".into()),
            ..Default::default()
        }
    }

    #[test]
    fn blocked_question_skips_model() {
        let service = ChatbotService::new(MockChatClient::new("should not be used"));
        let reply = service.generate_response("Am I dying?", &report(), &[], &[]);
        assert_eq!(reply, REFUSAL_RESPONSE);
        assert!(service.client.calls().is_empty());
    }

    #[test]
    fn model_reply_is_returned_with_bold_fixed() {
        let service = ChatbotService::new(MockChatClient::new("** LDL ** is above range."));
        let reply = service.generate_response("What about LDL?", &report(), &[], &[]);
        assert_eq!(reply, "**LDL** is above range.");

        let calls = service.client.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][1].content.contains("\"type\": \"Lipid Profile\""));
        assert!(calls[0][1].content.ends_with("USER QUESTION:\nWhat about LDL?"));
    }

    #[test]
    fn model_failure_returns_apology() {
        let service = ChatbotService::new(MockChatClient::failing("503"));
        let reply = service.generate_response("What is HDL?", &report(), &[], &[]);
        assert_eq!(reply, UNAVAILABLE_RESPONSE);
    }
}
