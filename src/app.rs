use std::time::{Duration, Instant};

use serde_json::Value;

use crate::board::BoardStore;
use crate::commands::{self, Command, Outcome};
use crate::connection::{Connection, ConnectionError, Outbound};
use crate::constants::app::DEFAULT_RENDER_FPS;
use crate::decks::DeckRegistry;
use crate::input::{Hotkey, InputGate, TextBuffers};
use crate::notice::Notice;
use crate::protocol::inbound;
use crate::types::{Card, DeckInfo};

/// Result of feeding one printable key to the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Text entry owns the keyboard; the caller should treat the key as text.
    Suppressed,
    Dispatched(Hotkey, Outcome),
    Unbound,
}

/// All client state, owned by the event loop.
pub struct App {
    quit: bool,
    fps: u32,

    pub(crate) board: BoardStore,
    pub(crate) decks: DeckRegistry,
    pub(crate) gate: InputGate,
    pub(crate) buffers: TextBuffers,
    pub(crate) notice: Notice,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_FPS, Notice::default().duration())
    }
}

impl App {
    pub fn new(fps: u32, notice_duration: Duration) -> Self {
        Self {
            quit: false,
            fps,
            board: BoardStore::new(),
            decks: DeckRegistry::new(),
            gate: InputGate::new(),
            buffers: TextBuffers::default(),
            notice: Notice::new(notice_duration),
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 { self.fps }
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn board(&self) -> &BoardStore { &self.board }
    pub fn decks(&self) -> &DeckRegistry { &self.decks }
    pub fn decks_mut(&mut self) -> &mut DeckRegistry { &mut self.decks }
    pub fn gate(&self) -> &InputGate { &self.gate }
    pub fn buffers(&self) -> &TextBuffers { &self.buffers }
    pub fn buffers_mut(&mut self) -> &mut TextBuffers { &mut self.buffers }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn notice_at(&self, now: Instant) -> Option<&str> {
        self.notice.visible(now)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice.dismiss();
    }

    // ----- commands -----
    pub fn run(&mut self, cmd: Command, out: &dyn Outbound) -> Outcome {
        commands::dispatch(self, cmd, out)
    }

    /// Gate-aware single-key dispatch. The Searching flag is read right here,
    /// before anything else happens.
    pub fn handle_key(&mut self, key: char, out: &dyn Outbound) -> KeyOutcome {
        if self.gate.suppresses_hotkeys() {
            return KeyOutcome::Suppressed;
        }
        let Some(hotkey) = Hotkey::from_char(key) else {
            return KeyOutcome::Unbound;
        };
        let outcome = self.run(command_for(hotkey), out);
        log::debug!("hotkey {key:?} -> {outcome:?}");
        KeyOutcome::Dispatched(hotkey, outcome)
    }

    /// A printable key from the terminal. Hotkeys win; while searching the
    /// key is search text, and with the deck form open a non-hotkey goes
    /// into the focused field.
    pub fn type_char(&mut self, c: char, out: &dyn Outbound) -> KeyOutcome {
        let outcome = self.handle_key(c, out);
        match outcome {
            KeyOutcome::Suppressed => self.buffers.search.push(c),
            KeyOutcome::Unbound if self.gate.mode().deck_import_open => {
                self.buffers.focused_deck_field_mut().push(c);
            }
            _ => {}
        }
        outcome
    }

    /// Select whatever the deck browser cursor is on.
    pub fn select_highlighted_deck(&mut self, out: &dyn Outbound) -> Option<Outcome> {
        let deck_list_index = self.decks.highlighted()?.deck_list_index;
        Some(self.run(Command::SelectDeck { deck_list_index }, out))
    }

    // ----- inbound -----
    pub fn on_cards(&mut self, cards: Vec<Card>) {
        self.board.replace_all(cards);
    }

    pub fn on_decks(&mut self, decks: Vec<DeckInfo>) {
        self.decks.set_list(decks);
    }

    pub fn on_deck_count(&mut self, remaining: i64) {
        self.decks.set_counter(remaining);
    }

    pub fn on_error(&mut self, payload: Value, now: Instant) {
        let message = match payload {
            Value::String(s) => s,
            other => other.to_string(),
        };
        log::info!("server error: {message}");
        self.notice.show(message, now);
    }
}

fn command_for(hotkey: Hotkey) -> Command {
    match hotkey {
        Hotkey::AddCard => Command::OpenSearch,
        Hotkey::Reset => Command::ClearBoard,
        Hotkey::DeckImport => Command::ToggleDeckImport,
        Hotkey::SavedDecks => Command::RequestDecks,
        Hotkey::DrawCard => Command::DrawTopCard,
    }
}

/// Wire the board's inbound events. Must run before `open()`.
pub fn register_handlers(conn: &mut Connection<App>) -> Result<(), ConnectionError> {
    conn.on_typed(inbound::CARDS, |app: &mut App, cards: Vec<Card>| app.on_cards(cards))?;
    conn.on_typed(inbound::DECKS, |app: &mut App, decks: Vec<DeckInfo>| app.on_decks(decks))?;
    conn.on_typed(inbound::DECK_COUNT_CHANGE, |app: &mut App, n: i64| app.on_deck_count(n))?;
    conn.on(inbound::ERROR, |app: &mut App, payload| {
        app.on_error(payload, Instant::now());
        Ok(())
    })?;

    // Lifecycle is log-only
    conn.on(inbound::CONNECT, |_, _| {
        log::info!("board session started");
        Ok(())
    })?;
    conn.on(inbound::DISCONNECT, |_, reason| {
        log::info!("disconnected from board server: {reason}");
        Ok(())
    })?;
    conn.on(inbound::CONNECT_ERROR, |_, reason| {
        log::error!("connection error: {reason}");
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;
    use serde_json::json;

    #[test]
    fn clear_key_is_suppressed_while_searching() {
        let mut conn: Connection<App> = Connection::new("ws://unused");
        let (mut out_rx, _in_tx) = conn.open_in_memory().unwrap();
        let mut app = App::default();

        assert_eq!(
            app.handle_key('e', &conn),
            KeyOutcome::Dispatched(Hotkey::AddCard, Outcome::Local)
        );
        assert_eq!(app.handle_key('r', &conn), KeyOutcome::Suppressed);
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn typed_text_fills_deck_form_and_search() {
        let mut conn: Connection<App> = Connection::new("ws://unused");
        let (mut out_rx, _in_tx) = conn.open_in_memory().unwrap();
        let mut app = App::default();

        app.type_char('d', &conn);
        assert!(app.gate().mode().deck_import_open);
        for c in "Mono".chars() {
            assert_eq!(app.type_char(c, &conn), KeyOutcome::Unbound);
        }
        app.buffers_mut().next_deck_field();
        for c in "4 Elf".chars() {
            app.type_char(c, &conn);
        }
        assert_eq!(app.buffers().deck_name, "Mono");
        assert_eq!(app.buffers().deck_list, "4 Elf");

        // hotkeys still fire with the form open
        app.type_char('e', &conn);
        assert!(app.gate().is_searching());
        for c in "rest".chars() {
            assert_eq!(app.type_char(c, &conn), KeyOutcome::Suppressed);
        }
        assert_eq!(app.buffers().search, "rest");
        assert_eq!(app.buffers().deck_name, "Mono");
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn unbound_keys_are_dropped_with_form_closed() {
        let mut conn: Connection<App> = Connection::new("ws://unused");
        let _pipes = conn.open_in_memory().unwrap();
        let mut app = App::default();
        app.type_char('M', &conn);
        assert!(app.buffers().deck_name.is_empty());
        assert!(app.buffers().search.is_empty());
    }

    #[test]
    fn unbound_and_uppercase_keys_do_nothing() {
        let mut conn: Connection<App> = Connection::new("ws://unused");
        let (mut out_rx, _in_tx) = conn.open_in_memory().unwrap();
        let mut app = App::default();
        assert_eq!(app.handle_key('x', &conn), KeyOutcome::Unbound);
        assert_eq!(app.handle_key('R', &conn), KeyOutcome::Unbound);
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn inbound_frames_reach_app_state() {
        let mut conn: Connection<App> = Connection::new("ws://unused");
        register_handlers(&mut conn).unwrap();
        for event in ["cards", "decks", "deckCountChange", "error", "connect", "disconnect", "connect_error"] {
            assert!(conn.has_handler(event), "{event} not wired");
        }
        let mut app = App::default();

        conn.dispatch(
            &mut app,
            Frame::new(
                "cards",
                json!([{"id": 3, "url": "u", "name": "Forest", "x": 1.0, "y": 2.0, "locked": false, "tapped": true}]),
            ),
        );
        conn.dispatch(&mut app, Frame::new("deckCountChange", json!(52)));
        conn.dispatch(
            &mut app,
            Frame::new(
                "decks",
                json!([{"deckName": "Elves", "cardCount": 60, "deckListIndex": 2, "date": "2025-03-01T10:00:00Z"}]),
            ),
        );

        assert_eq!(app.board().len(), 1);
        assert!(app.board().cards()[0].tapped);
        assert_eq!(app.decks().remaining(), 52);
        assert_eq!(app.decks().decks()[0].deck_list_index, 2);
    }

    #[test]
    fn error_notice_shows_latest_message() {
        let mut app = App::default();
        let t0 = Instant::now();
        app.on_error(json!("Deck not found"), t0);
        app.on_error(json!("Server busy"), t0 + Duration::from_millis(800));
        assert_eq!(app.notice_at(t0 + Duration::from_millis(1000)), Some("Server busy"));

        app.on_error(json!({"code": 7}), t0);
        assert_eq!(app.notice_at(t0), Some(r#"{"code":7}"#));
    }
}
