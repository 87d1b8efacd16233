use std::sync::LazyLock;

use regex::Regex;

use super::LlmError;

/// Bold span with padding inside the markers: `** text **`.
static PADDED_BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*[ \t]*([^*\n]*?[^*\s])[ \t]*\*\*").expect("valid regex literal")
});

/// Strip a surrounding markdown code fence from a model reply.
///
/// Handles a leading ```` ```json ```` or bare ```` ``` ```` and a trailing
/// ```` ``` ````, trimming whitespace on both sides.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Strip fences and parse the reply as JSON.
pub fn parse_json_response(text: &str) -> Result<serde_json::Value, LlmError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| LlmError::JsonParsing(e.to_string()))
}

/// Tighten `** text **` to `**text**`. Markdown renderers do not treat the
/// padded form as bold and show the raw asterisks.
///
/// A span is only rewritten when both markers sit on a word boundary, so a
/// stray `**` (as in `5 ** 2`) is never paired with the next bold span.
pub fn tighten_bold_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = PADDED_BOLD.captures_at(text, pos) {
        let (Some(span), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let before = text[..span.start()].chars().next_back();
        let after = text[span.end()..].chars().next();

        if is_marker_boundary(before) && is_marker_boundary(after) {
            out.push_str(&text[copied..span.start()]);
            out.push_str("**");
            out.push_str(inner.as_str());
            out.push_str("**");
            copied = span.end();
            pos = span.end();
        } else {
            // Opening `**` is stray; look for a span after it.
            pos = span.start() + 2;
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn is_marker_boundary(c: Option<char>) -> bool {
    c.map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '*'))
}
