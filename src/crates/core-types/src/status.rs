use serde::Serialize;

/// Lifecycle of one streamed turn.
///
/// Terminal states are final for a given session instance; a new turn
/// always begins a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Idle,
    Connecting,
    Streaming,
    Completed,
    Errored,
    Cancelled,
}

impl StreamStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StreamStatus::Completed | StreamStatus::Errored | StreamStatus::Cancelled
        )
    }
}
