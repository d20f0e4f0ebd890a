use ratatui::layout::Rect;

use crate::constants::board::{CARD_HEIGHT, CARD_WIDTH};
use crate::types::Card;

/// Board pixels <-> terminal cells. Renderer-agnostic; the TUI and the
/// mouse handler both go through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardScale {
    pub px_per_col: u32,
    pub px_per_row: u32,
}

impl BoardScale {
    pub fn new(px_per_col: u32, px_per_row: u32) -> Self {
        Self {
            px_per_col: px_per_col.max(1),
            px_per_row: px_per_row.max(1),
        }
    }

    /// Cell offset inside the board area. Negative positions clamp to 0.
    pub fn to_cells(&self, x: f64, y: f64) -> (u16, u16) {
        let col = (x / self.px_per_col as f64).floor().clamp(0.0, u16::MAX as f64);
        let row = (y / self.px_per_row as f64).floor().clamp(0.0, u16::MAX as f64);
        (col as u16, row as u16)
    }

    pub fn to_pixels(&self, col: u16, row: u16) -> (f64, f64) {
        (
            col as f64 * self.px_per_col as f64,
            row as f64 * self.px_per_row as f64,
        )
    }
}

/// Where a card lands inside `area`, clipped to it. `None` when the card is
/// entirely off-screen.
pub fn card_rect(area: Rect, scale: BoardScale, card: &Card) -> Option<Rect> {
    let (col, row) = scale.to_cells(card.x, card.y);
    if col >= area.width || row >= area.height {
        return None;
    }
    let width = CARD_WIDTH.min(area.width - col);
    let height = CARD_HEIGHT.min(area.height - row);
    Some(Rect::new(area.x + col, area.y + row, width, height))
}

/// Index of the topmost card under the cell. Later cards draw on top.
pub fn hit_test(area: Rect, scale: BoardScale, cards: &[Card], col: u16, row: u16) -> Option<usize> {
    cards.iter().enumerate().rev().find_map(|(i, card)| {
        let r = card_rect(area, scale, card)?;
        let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
        inside.then_some(i)
    })
}

/// Board-pixel position for dropping a card whose grab point was
/// `grab` cells from its top-left corner.
pub fn drop_position(
    area: Rect,
    scale: BoardScale,
    col: u16,
    row: u16,
    grab: (u16, u16),
) -> (f64, f64) {
    let local_col = col.saturating_sub(area.x).saturating_sub(grab.0);
    let local_row = row.saturating_sub(area.y).saturating_sub(grab.1);
    scale.to_pixels(local_col, local_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_at(id: i64, x: f64, y: f64) -> Card {
        Card {
            id,
            url: String::new(),
            name: String::new(),
            x,
            y,
            locked: false,
            tapped: false,
        }
    }

    #[test]
    fn pixels_map_to_cells() {
        let scale = BoardScale::new(10, 20);
        assert_eq!(scale.to_cells(125.0, 61.0), (12, 3));
        assert_eq!(scale.to_cells(-40.0, 5.0), (0, 0));
        assert_eq!(scale.to_pixels(12, 3), (120.0, 60.0));
    }

    #[test]
    fn topmost_card_wins_hit_test() {
        let area = Rect::new(0, 1, 80, 20);
        let scale = BoardScale::new(10, 20);
        let cards = vec![card_at(1, 0.0, 0.0), card_at(2, 50.0, 20.0)];
        // (6, 2) is covered by both
        assert_eq!(hit_test(area, scale, &cards, 6, 2), Some(1));
        assert_eq!(hit_test(area, scale, &cards, 1, 1), Some(0));
        assert_eq!(hit_test(area, scale, &cards, 70, 15), None);
    }

    #[test]
    fn offscreen_cards_are_clipped() {
        let area = Rect::new(0, 0, 20, 5);
        let scale = BoardScale::new(10, 20);
        assert!(card_rect(area, scale, &card_at(1, 500.0, 0.0)).is_none());
        let r = card_rect(area, scale, &card_at(1, 100.0, 40.0)).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (10, 2, 10, 3));
    }

    #[test]
    fn drop_keeps_grab_offset() {
        let area = Rect::new(0, 1, 80, 20);
        let scale = BoardScale::new(10, 20);
        assert_eq!(drop_position(area, scale, 15, 6, (3, 1)), (120.0, 80.0));
    }
}
