use serde::Deserialize;

/// One decoded unit of the streamed reply.
///
/// The backend discriminates events by their `type` field. The `[DONE]`
/// terminal sentinel is not JSON and never reaches this enum; the framing
/// layer recognizes it before decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ProtocolEvent {
    #[serde(rename = "chunk")]
    Chunk { content: String },
    #[serde(rename = "session")]
    Session { session_id: String },
    #[serde(rename = "thinking")]
    Thinking { stage: String },
    #[serde(rename = "complete")]
    Complete {
        #[serde(default)]
        suggested_actions: Vec<String>,
        #[serde(default)]
        meta_text: Option<String>,
    },
    #[serde(rename = "error")]
    Error { error: String },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_chunk() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"chunk","content":"Hi"}"#).unwrap();
        assert_eq!(event, ProtocolEvent::Chunk { content: "Hi".into() });
    }

    #[test]
    fn decodes_session_assignment() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"session","session_id":"sess-1"}"#).unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Session {
                session_id: "sess-1".into()
            }
        );
    }

    #[test]
    fn decodes_complete_with_missing_optional_fields() {
        let event: ProtocolEvent = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Complete {
                suggested_actions: vec![],
                meta_text: None,
            }
        );
    }

    #[test]
    fn decodes_complete_with_all_fields() {
        let event: ProtocolEvent = serde_json::from_str(
            r#"{"type":"complete","suggested_actions":["A","B"],"meta_text":"afterword"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ProtocolEvent::Complete {
                suggested_actions: vec!["A".into(), "B".into()],
                meta_text: Some("afterword".into()),
            }
        );
    }

    #[test]
    fn unknown_type_maps_to_unknown_variant() {
        let event: ProtocolEvent =
            serde_json::from_str(r#"{"type":"telemetry","payload":1}"#).unwrap();
        assert_eq!(event, ProtocolEvent::Unknown);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        assert!(serde_json::from_str::<ProtocolEvent>(r#"{"type":"chunk"}"#).is_err());
    }
}
