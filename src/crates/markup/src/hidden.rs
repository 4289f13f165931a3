//! Out-of-band `hidden_context` extraction.
//!
//! The annotation rides inside the message text but is not part of the
//! narrative; it is split off before parsing and surfaced separately
//! behind an explicit reveal. At most one block per message is expected.

use regex::Regex;
use std::sync::OnceLock;

fn hidden_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<hidden_context>(.*)</hidden_context>")
            .expect("hidden_context pattern is valid")
    })
}

/// Split one message into its visible text and the hidden annotation.
///
/// The match is greedy and case-insensitive; the tags and everything
/// between them are removed from the visible text.
pub fn extract_hidden_context(text: &str) -> (String, Option<String>) {
    let Some(captures) = hidden_pattern().captures(text) else {
        return (text.to_string(), None);
    };

    let hidden = captures
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|h| !h.is_empty());
    let whole = match captures.get(0) {
        Some(m) => m,
        None => return (text.to_string(), None),
    };
    let visible = format!("{}{}", &text[..whole.start()], &text[whole.end()..]);
    (visible, hidden)
}
