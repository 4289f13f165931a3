//! Data-line framing of the turn protocol.

use log::{error, warn};
use talewire_core_types::ProtocolEvent;

/// Marker carried by every data-bearing line of the response body.
pub const DATA_PREFIX: &str = "data:";

/// Out-of-band terminal sentinel. Not JSON.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Outcome of decoding one protocol line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    Event(ProtocolEvent),
    /// Terminal sentinel; stop all further processing for this session.
    Done,
}

/// Decode one line of the streamed body.
///
/// Lines without the data prefix, payloads that fail to decode, and events
/// with an unrecognized `type` are skipped with a log entry; the stream
/// outlives any single bad line.
pub fn decode_line(line: &str) -> Option<DecodedLine> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload == DONE_SENTINEL {
        return Some(DecodedLine::Done);
    }
    match serde_json::from_str::<ProtocolEvent>(payload) {
        Ok(ProtocolEvent::Unknown) => {
            warn!("skipping protocol event with unrecognized type: {payload}");
            None
        }
        Ok(event) => Some(DecodedLine::Event(event)),
        Err(e) => {
            error!("protocol line failed to decode: {e}, data: {payload}");
            None
        }
    }
}
