//! Segment highlighter.
//!
//! Maps each parsed segment onto a fragment with a fixed visual role; the
//! consuming view decides the concrete styling per role.

use serde::Serialize;

use crate::hidden::extract_hidden_context;
use crate::parser::parse_document;
use crate::segment::Segment;

/// Fixed visual role of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentRole {
    /// Default body text.
    Body,
    /// Emphasized spoken dialogue.
    Dialogue,
    /// Muted italic stage action.
    Action,
    /// Collapsed inline block, revealed on demand.
    Obscured,
    /// Paragraph separator.
    ParagraphBreak,
}

/// One styled span of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub role: FragmentRole,
    pub text: String,
    /// Label shown on collapsed blocks; the tag name for tagged data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Fragment {
    fn new(role: FragmentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            label: None,
        }
    }
}

/// A fully rendered message: styled fragments plus any hidden annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub fragments: Vec<Fragment>,
    /// Surfaced only behind an explicit reveal toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<String>,
}

/// Render a parsed document into styled fragments, one per segment, in
/// document order.
pub fn highlight(document: &[Segment]) -> Vec<Fragment> {
    document
        .iter()
        .map(|segment| match segment {
            Segment::Narration { text } => Fragment::new(FragmentRole::Body, text),
            Segment::DialogueDouble { text } | Segment::DialogueSingle { text } => {
                Fragment::new(FragmentRole::Dialogue, text)
            }
            Segment::Action { text } => Fragment::new(FragmentRole::Action, text),
            Segment::TaggedData { tag, text } => Fragment {
                role: FragmentRole::Obscured,
                text: text.clone(),
                label: Some(tag.clone()),
            },
            Segment::LineBreak => Fragment::new(FragmentRole::ParagraphBreak, "\n\n"),
        })
        .collect()
}

/// Extraction → parse → highlight in one call; the shape the view consumes.
pub fn render_message(text: &str) -> RenderedMessage {
    let (visible, hidden) = extract_hidden_context(text);
    let document = parse_document(&visible);
    RenderedMessage {
        fragments: highlight(&document),
        hidden,
    }
}
