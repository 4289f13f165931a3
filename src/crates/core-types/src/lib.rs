//! Talewire shared wire DTOs
//!
//! Low-level types exchanged with the roleplay backend. Pure data, no IO.

pub mod protocol;
pub mod status;
pub mod turn;

pub use protocol::ProtocolEvent;
pub use status::StreamStatus;
pub use turn::{InteractionTurn, TurnRequestBody};
