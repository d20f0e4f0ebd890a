//! Event names and payload shapes exchanged with the board server.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Inbound event names
pub mod inbound {
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
    pub const CONNECT_ERROR: &str = "connect_error";
    pub const CARDS: &str = "cards";
    pub const ERROR: &str = "error";
    pub const DECKS: &str = "decks";
    pub const DECK_COUNT_CHANGE: &str = "deckCountChange";
}

/// Messages the client sends. Every one is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    NewCard { name: Option<String> },
    Clear,
    CardPositionChange { index: usize, x: f64, y: f64 },
    Tap { index: usize },
    NewDeck { deck_name: String, deck_list: String },
    SelectDeck { index: i64 },
    GetDecks,
    PlayTopCardOfDeck,
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::NewCard { .. } => "newCard",
            ClientEvent::Clear => "clear",
            ClientEvent::CardPositionChange { .. } => "cardPositionChange",
            ClientEvent::Tap { .. } => "tap",
            ClientEvent::NewDeck { .. } => "newDeck",
            ClientEvent::SelectDeck { .. } => "selectDeck",
            ClientEvent::GetDecks => "getDecks",
            ClientEvent::PlayTopCardOfDeck => "playTopCardOfDeck",
        }
    }

    /// Wire payload, or `None` when the event carries no argument.
    pub fn payload(&self) -> Option<Value> {
        match self {
            ClientEvent::NewCard { name: Some(name) } => Some(json!({ "name": name })),
            ClientEvent::NewCard { name: None } => None,
            ClientEvent::Clear => None,
            ClientEvent::CardPositionChange { index, x, y } => {
                Some(json!({ "index": index, "x": x, "y": y }))
            }
            ClientEvent::Tap { index } => Some(json!({ "index": index })),
            ClientEvent::NewDeck {
                deck_name,
                deck_list,
            } => Some(json!({ "deckName": deck_name, "deckList": deck_list })),
            ClientEvent::SelectDeck { index } => Some(json!({ "index": index })),
            ClientEvent::GetDecks => None,
            ClientEvent::PlayTopCardOfDeck => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shapes_match_server_contract() {
        let mv = ClientEvent::CardPositionChange { index: 2, x: 10.0, y: 20.5 };
        assert_eq!(mv.name(), "cardPositionChange");
        assert_eq!(mv.payload(), Some(json!({"index": 2, "x": 10.0, "y": 20.5})));

        let deck = ClientEvent::NewDeck {
            deck_name: "Elves".into(),
            deck_list: "4 Llanowar Elves\n20 Forest".into(),
        };
        assert_eq!(
            deck.payload(),
            Some(json!({"deckName": "Elves", "deckList": "4 Llanowar Elves\n20 Forest"}))
        );

        assert_eq!(ClientEvent::SelectDeck { index: 3 }.payload(), Some(json!({"index": 3})));
    }

    #[test]
    fn argumentless_events_have_no_payload() {
        for ev in [
            ClientEvent::NewCard { name: None },
            ClientEvent::Clear,
            ClientEvent::GetDecks,
            ClientEvent::PlayTopCardOfDeck,
        ] {
            assert!(ev.payload().is_none(), "{} should be bare", ev.name());
        }
    }
}
