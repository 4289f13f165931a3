//! Mutable state of one in-flight turn.

use log::warn;
use serde::Serialize;
use talewire_core_types::{ProtocolEvent, StreamStatus};

/// State accumulated while one streamed reply is in flight.
///
/// Mutated only by the session controller, strictly in event arrival
/// order; consumers read cloned snapshots through their handle.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSession {
    pub status: StreamStatus,
    pub accumulated_text: String,
    pub session_id: Option<String>,
    pub thinking_stage: Option<String>,
    pub suggested_actions: Vec<String>,
    pub trailing_metadata: Option<String>,
    pub last_error: Option<String>,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self {
            status: StreamStatus::Idle,
            accumulated_text: String::new(),
            session_id: None,
            thinking_stage: None,
            suggested_actions: Vec::new(),
            trailing_metadata: None,
            last_error: None,
        }
    }
}

impl StreamSession {
    pub(crate) fn connecting() -> Self {
        Self {
            status: StreamStatus::Connecting,
            ..Self::default()
        }
    }

    /// Apply one decoded event.
    pub(crate) fn apply(&mut self, event: ProtocolEvent) {
        match event {
            ProtocolEvent::Chunk { content } => {
                self.accumulated_text.push_str(&content);
            }
            ProtocolEvent::Session { session_id } => match &self.session_id {
                None => self.session_id = Some(session_id),
                Some(current) if *current != session_id => {
                    // First assignment wins.
                    warn!("ignoring session reassignment {current} -> {session_id}");
                }
                Some(_) => {}
            },
            ProtocolEvent::Thinking { stage } => {
                self.thinking_stage = Some(stage);
            }
            ProtocolEvent::Complete {
                suggested_actions,
                meta_text,
            } => {
                self.suggested_actions = suggested_actions;
                self.trailing_metadata = meta_text;
                self.thinking_stage = None;
                self.status = StreamStatus::Completed;
            }
            ProtocolEvent::Error { error } => {
                self.thinking_stage = None;
                self.last_error = Some(error);
                self.status = StreamStatus::Errored;
            }
            ProtocolEvent::Unknown => {}
        }
    }

    /// Normal end of stream with no further field changes.
    pub(crate) fn complete(&mut self) {
        if !self.status.is_terminal() {
            self.status = StreamStatus::Completed;
        }
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.thinking_stage = None;
        self.last_error = Some(message.into());
        self.status = StreamStatus::Errored;
    }

    pub(crate) fn cancel(&mut self) {
        if !self.status.is_terminal() {
            self.status = StreamStatus::Cancelled;
        }
        self.thinking_stage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streaming_session() -> StreamSession {
        StreamSession {
            status: StreamStatus::Streaming,
            ..StreamSession::default()
        }
    }

    #[test]
    fn chunks_append_in_order() {
        let mut session = streaming_session();
        session.apply(ProtocolEvent::Chunk {
            content: "Hello".into(),
        });
        session.apply(ProtocolEvent::Chunk {
            content: ", world".into(),
        });
        assert_eq!(session.accumulated_text, "Hello, world");
        assert_eq!(session.status, StreamStatus::Streaming);
    }

    #[test]
    fn first_session_assignment_wins() {
        let mut session = streaming_session();
        session.apply(ProtocolEvent::Session {
            session_id: "first".into(),
        });
        session.apply(ProtocolEvent::Session {
            session_id: "second".into(),
        });
        assert_eq!(session.session_id.as_deref(), Some("first"));
    }

    #[test]
    fn thinking_stage_is_overwritten() {
        let mut session = streaming_session();
        session.apply(ProtocolEvent::Thinking {
            stage: "recalling".into(),
        });
        session.apply(ProtocolEvent::Thinking {
            stage: "composing".into(),
        });
        assert_eq!(session.thinking_stage.as_deref(), Some("composing"));
    }

    #[test]
    fn complete_populates_fields_and_clears_thinking() {
        let mut session = streaming_session();
        session.apply(ProtocolEvent::Thinking {
            stage: "composing".into(),
        });
        session.apply(ProtocolEvent::Complete {
            suggested_actions: vec!["A".into(), "B".into()],
            meta_text: Some("afterword".into()),
        });
        assert_eq!(session.status, StreamStatus::Completed);
        assert_eq!(session.suggested_actions, vec!["A", "B"]);
        assert_eq!(session.trailing_metadata.as_deref(), Some("afterword"));
        assert_eq!(session.thinking_stage, None);
    }

    #[test]
    fn error_event_surfaces_message_and_ends_session() {
        let mut session = streaming_session();
        session.apply(ProtocolEvent::Thinking {
            stage: "composing".into(),
        });
        session.apply(ProtocolEvent::Error {
            error: "model unavailable".into(),
        });
        assert_eq!(session.status, StreamStatus::Errored);
        assert_eq!(session.last_error.as_deref(), Some("model unavailable"));
        assert_eq!(session.thinking_stage, None);
    }

    #[test]
    fn complete_after_terminal_state_does_not_reopen() {
        let mut session = streaming_session();
        session.fail("gone");
        session.complete();
        assert_eq!(session.status, StreamStatus::Errored);
    }

    #[test]
    fn cancel_is_idempotent_and_respects_terminal_states() {
        let mut session = streaming_session();
        session.cancel();
        session.cancel();
        assert_eq!(session.status, StreamStatus::Cancelled);

        let mut completed = streaming_session();
        completed.complete();
        completed.cancel();
        assert_eq!(completed.status, StreamStatus::Completed);
    }
}
