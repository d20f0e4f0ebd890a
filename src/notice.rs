//! One-slot transient notice for server `error` messages.

use std::time::{Duration, Instant};

use crate::constants::app::NOTICE_DURATION_MS;

#[derive(Debug)]
pub struct Notice {
    current: Option<(String, Instant)>,
    duration: Duration,
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(Duration::from_millis(NOTICE_DURATION_MS))
    }
}

impl Notice {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: None,
            duration,
        }
    }

    /// Replaces whatever is showing.
    pub fn show(&mut self, message: String, now: Instant) {
        self.current = Some((message, now));
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Visible message at `now`, if it has not expired.
    pub fn visible(&self, now: Instant) -> Option<&str> {
        self.current.as_ref().and_then(|(msg, shown)| {
            if now.saturating_duration_since(*shown) < self.duration {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
