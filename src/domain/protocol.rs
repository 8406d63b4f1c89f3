//! Wire format of the match server.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Identifier the server hands out for a new match
pub type MatchId = u32;

/// Body of the `POST /matches/new` response.
///
/// The id must be an integer; anything else fails deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatchResponse {
    pub id: MatchId,
}

/// Server-to-client messages, tagged by `kind`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ServerMessage {
    /// The requested match id is unknown to the server
    GameDoesNotExist,
    PlayerJoined,
    /// A player chose a name
    PlayerIdentified {
        #[serde(default)]
        name: Option<String>,
    },
    /// Both players are ready; the game is in progress
    GameStarted,
    /// Any kind this client does not know about
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Parse an inbound text frame. Malformed frames are logged and dropped.
    pub fn parse(text: &str) -> Option<ServerMessage> {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(ServerMessage::Unknown) => {
                debug!(%text, "ignoring unknown message kind");
                None
            }
            Ok(message) => Some(message),
            Err(error) => {
                warn!(%error, %text, "ignoring malformed message");
                None
            }
        }
    }
}

/// Receives inbound messages. Returns whether the message was handled.
pub trait MessageHandler {
    fn handle(&mut self, message: &ServerMessage) -> bool;
}

impl<F> MessageHandler for F
where
    F: FnMut(&ServerMessage) -> bool,
{
    fn handle(&mut self, message: &ServerMessage) -> bool {
        self(message)
    }
}

/// Offer `message` to each handler in turn until one handles it
pub fn dispatch(message: &ServerMessage, handlers: &mut [&mut dyn MessageHandler]) -> bool {
    handlers.iter_mut().any(|handler| handler.handle(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            ServerMessage::parse(r#"{"kind":"GameDoesNotExist"}"#),
            Some(ServerMessage::GameDoesNotExist)
        );
        assert_eq!(
            ServerMessage::parse(r#"{"kind":"PlayerJoined"}"#),
            Some(ServerMessage::PlayerJoined)
        );
        assert_eq!(
            ServerMessage::parse(r#"{"kind":"PlayerIdentified","name":"ada"}"#),
            Some(ServerMessage::PlayerIdentified {
                name: Some("ada".to_string())
            })
        );
        assert_eq!(
            ServerMessage::parse(r#"{"kind":"PlayerIdentified"}"#),
            Some(ServerMessage::PlayerIdentified { name: None })
        );
        assert_eq!(
            ServerMessage::parse(r#"{"kind":"GameStarted"}"#),
            Some(ServerMessage::GameStarted)
        );
    }

    #[test]
    fn test_unknown_and_malformed_are_dropped() {
        assert_eq!(ServerMessage::parse(r#"{"kind":"OfferToDraw"}"#), None);
        assert_eq!(ServerMessage::parse("FOOO"), None);
        assert_eq!(ServerMessage::parse(r#"{"no_kind":true}"#), None);
    }

    #[test]
    fn test_new_match_response_requires_integer_id() {
        let ok: NewMatchResponse = serde_json::from_str(r#"{"id":17}"#).unwrap();
        assert_eq!(ok.id, 17);
        assert!(serde_json::from_str::<NewMatchResponse>(r#"{"id":"17"}"#).is_err());
        assert!(serde_json::from_str::<NewMatchResponse>(r#"{"id":1.5}"#).is_err());
        assert!(serde_json::from_str::<NewMatchResponse>(r#"{}"#).is_err());
    }

    #[test]
    fn test_layered_handlers() {
        let mut lobby_calls = 0;
        let mut fallback_calls = 0;
        {
            let mut lobby = |message: &ServerMessage| {
                lobby_calls += 1;
                matches!(message, ServerMessage::PlayerJoined)
            };
            let mut fallback = |_: &ServerMessage| {
                fallback_calls += 1;
                true
            };

            assert!(dispatch(
                &ServerMessage::PlayerJoined,
                &mut [&mut lobby, &mut fallback]
            ));
            assert!(dispatch(
                &ServerMessage::GameStarted,
                &mut [&mut lobby, &mut fallback]
            ));
        }
        assert_eq!(lobby_calls, 2);
        assert_eq!(fallback_calls, 1);
    }

    #[test]
    fn test_no_handler_claims_message() {
        let mut ignore_all = |_: &ServerMessage| false;
        assert!(!dispatch(&ServerMessage::GameStarted, &mut [&mut ignore_all]));
        assert!(!dispatch(&ServerMessage::GameStarted, &mut []));
    }
}
