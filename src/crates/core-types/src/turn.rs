use serde::Serialize;

/// One user submission. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionTurn {
    pub character_id: String,
    pub user_message: String,
    /// Present when continuing an existing conversation.
    pub session_id: Option<String>,
}

impl InteractionTurn {
    pub fn new(character_id: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            character_id: character_id.into(),
            user_message: user_message.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Wire body of the turn request.
    pub fn request_body(&self) -> TurnRequestBody<'_> {
        TurnRequestBody {
            character_name: &self.character_id,
            user_message: &self.user_message,
            session_id: self.session_id.as_deref(),
        }
    }
}

/// JSON body POSTed to the interaction endpoint. An absent session id is
/// omitted from the payload rather than sent as null.
#[derive(Debug, Serialize)]
pub struct TurnRequestBody<'a> {
    pub character_name: &'a str,
    pub user_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_omits_absent_session_id() {
        let turn = InteractionTurn::new("elara", "hello");
        let json = serde_json::to_value(turn.request_body()).unwrap();
        assert_eq!(json["character_name"], "elara");
        assert_eq!(json["user_message"], "hello");
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn request_body_carries_session_id_when_set() {
        let turn = InteractionTurn::new("elara", "hello").with_session("sess-42");
        let json = serde_json::to_value(turn.request_body()).unwrap();
        assert_eq!(json["session_id"], "sess-42");
    }
}
