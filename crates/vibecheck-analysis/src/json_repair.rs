//! JSON extraction and best-effort repair for free-text provider replies.
//!
//! The provider is asked to reply with pure JSON but routinely wraps it in
//! prose or emits almost-JSON. Extraction takes the substring from the first
//! `{` to the last `}`; if that fails to parse, one repair pass runs (strip
//! trailing commas before closers, escape bare newlines inside string
//! literals, normalize single-quoted keys) and parsing is retried once.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AnalysisError;

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));
static SINGLE_QUOTED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([A-Za-z0-9_]+)'(\s*:)").expect("valid regex"));

/// The first top-level JSON object candidate in `text`.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// One best-effort repair pass over an almost-JSON object.
fn repair(raw: &str) -> String {
    // Bare newlines inside string literals are invalid JSON; escape them
    // with a character walk so newlines between tokens stay untouched.
    let mut escaped = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut prev_backslash = false;
    for c in raw.chars() {
        match c {
            '"' if !prev_backslash => {
                in_string = !in_string;
                escaped.push(c);
            }
            '\n' if in_string => escaped.push_str("\\n"),
            '\r' if in_string => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
        prev_backslash = c == '\\' && !prev_backslash;
    }

    let no_trailing = TRAILING_COMMA_RE.replace_all(&escaped, "$1");
    SINGLE_QUOTED_KEY_RE
        .replace_all(&no_trailing, "\"$1\"$2")
        .into_owned()
}

/// Parse the JSON object embedded in a provider reply.
///
/// # Errors
///
/// Returns [`AnalysisError::Malformed`] if no object candidate exists or if
/// parsing still fails after the repair pass.
pub fn parse_report_text(text: &str) -> Result<serde_json::Value, AnalysisError> {
    let Some(candidate) = extract_json_object(text) else {
        return Err(AnalysisError::Malformed {
            reason: "reply contains no JSON object".to_string(),
        });
    };

    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let repaired = repair(candidate);
            serde_json::from_str(&repaired).map_err(|retry_err| {
                tracing::debug!(
                    first_error = %first_err,
                    retry_error = %retry_err,
                    "provider reply unparseable even after repair"
                );
                AnalysisError::Malformed {
                    reason: retry_err.to_string(),
                }
            })
        }
    }
}
