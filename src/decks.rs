//! Server-driven deck listing and active-deck counter.

use crate::connection::{ConnectionError, Outbound};
use crate::protocol::ClientEvent;
use crate::types::DeckInfo;

#[derive(Debug, Default)]
pub struct DeckRegistry {
    decks: Vec<DeckInfo>,
    remaining: i64,
    cursor: usize,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the server for a fresh listing; the answer arrives as `decks`.
    pub fn request_refresh(&self, out: &dyn Outbound) -> Result<(), ConnectionError> {
        out.send(&ClientEvent::GetDecks)
    }

    pub fn set_list(&mut self, list: Vec<DeckInfo>) {
        log::debug!("deck listing: {} decks", list.len());
        self.decks = list;
        self.cursor = 0;
    }

    pub fn set_counter(&mut self, remaining: i64) {
        self.remaining = remaining;
    }

    /// Raw strings go out untouched; the server owns deck-list parsing.
    pub fn submit_deck(
        &self,
        name: &str,
        raw_list: &str,
        out: &dyn Outbound,
    ) -> Result<(), ConnectionError> {
        out.send(&ClientEvent::NewDeck {
            deck_name: name.to_string(),
            deck_list: raw_list.to_string(),
        })
    }

    pub fn select_deck(&self, deck_list_index: i64, out: &dyn Outbound) -> Result<(), ConnectionError> {
        out.send(&ClientEvent::SelectDeck { index: deck_list_index })
    }

    pub fn decks(&self) -> &[DeckInfo] {
        &self.decks
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    // ----- browse cursor -----
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.decks.len() {
            self.cursor += 1;
        }
    }

    pub fn highlighted(&self) -> Option<&DeckInfo> {
        self.decks.get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(name: &str, index: i64) -> DeckInfo {
        DeckInfo {
            deck_name: name.into(),
            card_count: 60,
            deck_list_index: index,
            date: "2025-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn listing_is_replaced_wholesale() {
        let mut reg = DeckRegistry::new();
        reg.set_list(vec![deck("a", 0), deck("b", 1)]);
        reg.set_list(vec![deck("c", 7)]);
        assert_eq!(reg.decks().len(), 1);
        assert_eq!(reg.decks()[0].deck_list_index, 7);
    }

    #[test]
    fn counter_is_replaced_not_accumulated() {
        let mut reg = DeckRegistry::new();
        assert_eq!(reg.remaining(), 0);
        reg.set_counter(60);
        reg.set_counter(59);
        assert_eq!(reg.remaining(), 59);
    }

    #[test]
    fn cursor_is_clamped_and_reset_by_listing() {
        let mut reg = DeckRegistry::new();
        reg.cursor_up();
        assert_eq!(reg.cursor(), 0);
        assert!(reg.highlighted().is_none());

        reg.set_list(vec![deck("a", 0), deck("b", 4)]);
        reg.cursor_down();
        reg.cursor_down();
        assert_eq!(reg.cursor(), 1);
        assert_eq!(reg.highlighted().map(|d| d.deck_list_index), Some(4));

        reg.set_list(vec![deck("c", 2)]);
        assert_eq!(reg.cursor(), 0);
    }
}
