//! Local mirror of the server's card collection.
//!
//! The collection is only ever replaced wholesale by a server snapshot. The
//! single local write is the optimistic position patch made when a drag ends;
//! the next snapshot overwrites it whether or not the server agreed.

use std::collections::HashSet;

use crate::types::Card;

#[derive(Debug, Default)]
pub struct BoardStore {
    cards: Vec<Card>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative replace; snapshot order is kept as-is.
    pub fn replace_all(&mut self, snapshot: Vec<Card>) {
        let mut seen = HashSet::with_capacity(snapshot.len());
        if let Some(dup) = snapshot.iter().find(|c| !seen.insert(c.id)) {
            log::warn!("snapshot carries duplicate card id {}", dup.id);
        }
        log::debug!("board snapshot: {} cards", snapshot.len());
        self.cards = snapshot;
    }

    /// Optimistic move. Returns false when no card has `id`.
    pub fn apply_local_move(&mut self, id: i64, x: f64, y: f64) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(card) => {
                card.x = x;
                card.y = y;
                true
            }
            None => {
                log::debug!("local move for unknown card {id}");
                false
            }
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64, x: f64, y: f64) -> Card {
        Card {
            id,
            url: format!("https://cards.example/{id}.jpg"),
            name: format!("card-{id}"),
            x,
            y,
            locked: false,
            tapped: false,
        }
    }

    #[test]
    fn snapshot_keeps_size_and_order() {
        let mut board = BoardStore::new();
        board.replace_all(vec![card(7, 0.0, 0.0), card(2, 1.0, 1.0), card(5, 2.0, 2.0)]);
        let ids: Vec<i64> = board.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
        assert_eq!(board.len(), 3);

        board.replace_all(Vec::new());
        assert!(board.is_empty());
    }

    #[test]
    fn local_move_only_touches_position() {
        let mut board = BoardStore::new();
        let mut tapped = card(1, 10.0, 10.0);
        tapped.tapped = true;
        tapped.locked = true;
        board.replace_all(vec![card(0, 0.0, 0.0), tapped.clone()]);

        assert!(board.apply_local_move(1, 300.0, 150.0));
        let moved = &board.cards()[1];
        assert_eq!((moved.x, moved.y), (300.0, 150.0));
        assert_eq!(moved.name, tapped.name);
        assert_eq!(moved.url, tapped.url);
        assert!(moved.tapped && moved.locked);
        assert_eq!((board.cards()[0].x, board.cards()[0].y), (0.0, 0.0));
    }

    #[test]
    fn local_move_on_unknown_id_is_noop() {
        let mut board = BoardStore::new();
        board.replace_all(vec![card(0, 5.0, 5.0)]);
        assert!(!board.apply_local_move(42, 1.0, 1.0));
        assert_eq!(board.cards()[0].x, 5.0);
    }

    #[test]
    fn last_snapshot_wins_over_pending_move() {
        let mut board = BoardStore::new();
        board.replace_all(vec![card(3, 40.0, 60.0)]);
        board.apply_local_move(3, 500.0, 500.0);

        board.replace_all(vec![card(3, 40.0, 60.0)]);
        assert_eq!((board.cards()[0].x, board.cards()[0].y), (40.0, 60.0));
    }

    #[test]
    fn lookup_helpers() {
        let mut board = BoardStore::new();
        board.replace_all(vec![card(9, 0.0, 0.0), card(4, 0.0, 0.0)]);
        assert_eq!(board.position_of(4), Some(1));
        assert_eq!(board.position_of(1), None);
        assert_eq!(board.get(0).map(|c| c.id), Some(9));
        assert!(board.get(2).is_none());
    }
}
