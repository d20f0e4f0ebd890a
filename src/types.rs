use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card token on the shared board.
///
/// Only `x`/`y` are ever written on the client; everything else arrives with a
/// server snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub tapped: bool,
}

/// Saved deck as listed by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckInfo {
    pub deck_name: String,
    pub card_count: i64,
    pub deck_list_index: i64,
    // Raw server value; see `timestamp()`
    #[serde(default)]
    pub date: String,
}

impl DeckInfo {
    /// Parsed `date`, if the server sent RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One inbound frame: an event name and its (first) argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub event: String,
    pub payload: serde_json::Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}
