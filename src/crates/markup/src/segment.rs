use serde::Serialize;

/// A classified span of message text.
///
/// A document is an ordered sequence of segments covering every character
/// of the input exactly once. Quote and asterisk delimiters stay inside
/// their segment's text; tag delimiters do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Narration { text: String },
    DialogueDouble { text: String },
    DialogueSingle { text: String },
    Action { text: String },
    TaggedData { tag: String, text: String },
    LineBreak,
}
