use thiserror::Error;

/// Failures of the streamed-turn client.
///
/// Errors that reach the consuming view travel as text through the
/// session's `last_error` field; this enum types the fallible internals.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("turn request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("turn request rejected with status {0}")]
    Status(reqwest::StatusCode),

    #[error("stream read failed: {0}")]
    Read(String),

    #[error("giving up after {attempts} retry attempts")]
    RetriesExhausted { attempts: u32 },
}
