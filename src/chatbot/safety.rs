/// Phrases that are refused before any model call. Matched as lowercase
/// substrings of the question.
const BLOCKED_PHRASES: &[&str] = &[
    "prescribe",
    "medication for me",
    "diagnose me",
    "do i have cancer",
    "am i dying",
];

pub const REFUSAL_RESPONSE: &str = "I am an AI assistant and cannot provide medical diagnoses or prescribe medication. Please consult a qualified doctor for personal medical advice and treatment options.";

/// The blocked phrase found in `question`, if any.
pub fn blocked_phrase(question: &str) -> Option<&'static str> {
    let lower = question.to_lowercase();
    BLOCKED_PHRASES.iter().copied().find(|phrase| lower.contains(phrase))
}
