//! Narrative markup for roleplay messages
//!
//! Finished message text mixes narration, quoted dialogue, asterisk stage
//! actions, bracketed tagged data, and paragraph breaks. This crate parses
//! that grammar into an ordered segment document and renders it into
//! styled fragments; out-of-band `hidden_context` annotations are split
//! off before parsing.

pub mod hidden;
pub mod highlight;
pub mod parser;
pub mod segment;

pub use hidden::extract_hidden_context;
pub use highlight::{highlight, render_message, Fragment, FragmentRole, RenderedMessage};
pub use parser::parse_document;
pub use segment::Segment;
