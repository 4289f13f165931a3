//! Narrative markup lexer/parser.
//!
//! Grammar, in priority order: tagged data (`<tag>…</tag>`), double-quoted
//! dialogue, single-quoted dialogue, asterisk action, paragraph break (two
//! or more newlines), narration as the fallback. Every character of the
//! input lands in exactly one segment.

use crate::segment::Segment;

#[derive(Debug)]
struct Token {
    start: usize,
    end: usize,
    segment: Segment,
}

/// Parse message text into an ordered segment document.
///
/// Empty input yields an empty document. Unterminated quotes and
/// asterisks fall back to narration; an unterminated tag extends to the
/// end of the text.
pub fn parse_document(input: &str) -> Vec<Segment> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut tokens = scan_delimited(input);
    push_narration_gaps(input, &mut tokens);
    // Sub-rules emit their tokens independently of source position; order
    // is only guaranteed after this sort.
    tokens.sort_by_key(|token| token.start);
    tokens.into_iter().map(|token| token.segment).collect()
}

/// Collect every delimited span: tagged data, dialogue, actions, and
/// paragraph breaks. Narration gaps are filled in afterwards.
fn scan_delimited(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => {
                if let Some(token) = match_tagged(input, i) {
                    i = token.end;
                    tokens.push(token);
                } else {
                    i += 1;
                }
            }
            b'"' => i = claim_span(input, i, b'"', &mut tokens, |text| {
                Segment::DialogueDouble { text }
            }),
            b'\'' => i = claim_span(input, i, b'\'', &mut tokens, |text| {
                Segment::DialogueSingle { text }
            }),
            b'*' => i = claim_span(input, i, b'*', &mut tokens, |text| Segment::Action { text }),
            b'\n' if bytes.get(i + 1) == Some(&b'\n') => {
                let start = i;
                let mut end = i + 2;
                while bytes.get(end) == Some(&b'\n') {
                    end += 1;
                }
                tokens.push(Token {
                    start,
                    end,
                    segment: Segment::LineBreak,
                });
                i = end;
            }
            _ => i += 1,
        }
    }
    tokens
}

/// Claim a delimited span starting at `open`, or fall back to narration by
/// advancing a single byte when the closing delimiter never appears.
fn claim_span(
    input: &str,
    open: usize,
    delim: u8,
    tokens: &mut Vec<Token>,
    build: impl FnOnce(String) -> Segment,
) -> usize {
    match find_closing(input.as_bytes(), open, delim) {
        Some(close) => {
            tokens.push(Token {
                start: open,
                end: close + 1,
                segment: build(input[open..=close].to_string()),
            });
            close + 1
        }
        None => open + 1,
    }
}

/// Find the closing delimiter, honoring backslash escapes.
fn find_closing(bytes: &[u8], open: usize, delim: u8) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == delim => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Match `<tag>…</tag>` at `open`; an unclosed tag extends to the end of
/// the input. Returns `None` when `open` is not a well-formed tag start.
fn match_tagged(input: &str, open: usize) -> Option<Token> {
    let bytes = input.as_bytes();
    let name_start = open + 1;
    let mut i = name_start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == name_start || bytes.get(i) != Some(&b'>') {
        return None;
    }

    let tag = &input[name_start..i];
    let body_start = i + 1;
    let closing = format!("</{tag}>");
    let (end, text) = match input[body_start..].find(&closing) {
        Some(rel) => (
            body_start + rel + closing.len(),
            &input[body_start..body_start + rel],
        ),
        None => (input.len(), &input[body_start..]),
    };
    Some(Token {
        start: open,
        end,
        segment: Segment::TaggedData {
            tag: tag.to_string(),
            text: text.to_string(),
        },
    })
}

/// Cover every byte not claimed by a delimited span with narration tokens.
/// These are appended after the delimited tokens, so the final sort is what
/// restores source order.
fn push_narration_gaps(input: &str, tokens: &mut Vec<Token>) {
    let mut spans: Vec<(usize, usize)> = tokens.iter().map(|t| (t.start, t.end)).collect();
    spans.sort_unstable();

    let mut cursor = 0;
    for (start, end) in spans {
        if cursor < start {
            tokens.push(narration(input, cursor, start));
        }
        cursor = end;
    }
    if cursor < input.len() {
        tokens.push(narration(input, cursor, input.len()));
    }
}

fn narration(input: &str, start: usize, end: usize) -> Token {
    Token {
        start,
        end,
        segment: Segment::Narration {
            text: input[start..end].to_string(),
        },
    }
}
