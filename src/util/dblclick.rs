//! Double-click detection for card taps.
//!
//! Terminal mouse events carry no click count, so two presses on the same
//! card within the threshold are folded into one gesture here.

use std::time::{Duration, Instant};

use crate::constants::app::DOUBLE_CLICK_MS;

/// Two presses on the same card id within `threshold`.
///
/// # Example
/// ```
/// use cardtable::util::dblclick::DblClick;
/// use std::time::{Duration, Instant};
///
/// let mut dbl = DblClick::new(Duration::from_millis(280));
/// let t0 = Instant::now();
///
/// assert!(!dbl.register(7, t0));
/// assert!(dbl.register(7, t0 + Duration::from_millis(100)));
/// // a third press starts over
/// assert!(!dbl.register(7, t0 + Duration::from_millis(150)));
/// ```
#[derive(Debug, Clone)]
pub struct DblClick {
    last: Option<(i64, Instant)>,
    threshold: Duration,
}

impl Default for DblClick {
    fn default() -> Self {
        Self::new(Duration::from_millis(DOUBLE_CLICK_MS))
    }
}

impl DblClick {
    pub fn new(threshold: Duration) -> Self {
        Self {
            last: None,
            threshold,
        }
    }

    /// Register a press on `card_id` at `now`. Returns `true` when it
    /// completes a double click; the detector then resets.
    pub fn register(&mut self, card_id: i64, now: Instant) -> bool {
        if let Some((last_id, when)) = self.last {
            if last_id == card_id && now.saturating_duration_since(when) <= self.threshold {
                self.last = None;
                return true;
            }
        }
        self.last = Some((card_id, now));
        false
    }

    /// Forget the pending press (e.g. after a press on empty board).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
