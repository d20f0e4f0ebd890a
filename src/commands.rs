//! Command dispatcher: user intents to outbound messages plus local effects.
//!
//! Every networked command checks the channel first. A command issued without
//! one is logged and dropped with no local effect at all.

use crate::app::App;
use crate::connection::Outbound;
use crate::protocol::ClientEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Enter Searching, or ask for a random card if already searching.
    OpenSearch,
    SubmitSearch,
    CancelSearch,
    ClearBoard,
    /// `index` is the card's position in the current snapshot.
    MoveCard { index: usize, x: f64, y: f64 },
    TapCard { index: usize },
    RequestDecks,
    SubmitDeck,
    SelectDeck { deck_list_index: i64 },
    DrawTopCard,
    ToggleDeckImport,
}

impl Command {
    fn is_local(&self) -> bool {
        matches!(self, Command::CancelSearch | Command::ToggleDeckImport)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Outbound event name.
    Sent(&'static str),
    Local,
    /// No channel; nothing happened.
    Dropped,
    Rejected(&'static str),
}

pub fn dispatch(app: &mut App, cmd: Command, out: &dyn Outbound) -> Outcome {
    if !cmd.is_local() && !out.is_connected() {
        log::debug!("dropping {cmd:?}: socket not connected");
        return Outcome::Dropped;
    }

    match cmd {
        Command::ToggleDeckImport => {
            app.gate.toggle_deck_import();
            Outcome::Local
        }
        Command::CancelSearch => {
            app.gate.exit_search();
            app.buffers.search.clear();
            Outcome::Local
        }
        Command::OpenSearch => {
            if !app.gate.is_searching() {
                app.gate.enter_search();
                return Outcome::Local;
            }
            let outcome = emit(out, ClientEvent::NewCard { name: None });
            if outcome != Outcome::Dropped {
                app.gate.exit_search();
            }
            outcome
        }
        Command::SubmitSearch => {
            if app.buffers.search.trim().is_empty() {
                return Outcome::Rejected("empty search");
            }
            let name = app.buffers.search.clone();
            let outcome = emit(out, ClientEvent::NewCard { name: Some(name) });
            if outcome != Outcome::Dropped {
                app.buffers.search.clear();
                app.gate.exit_search();
            }
            outcome
        }
        Command::ClearBoard => emit(out, ClientEvent::Clear),
        Command::MoveCard { index, x, y } => {
            let Some(id) = app.board.get(index).map(|c| c.id) else {
                log::debug!("move for card index {index} outside the board");
                return Outcome::Rejected("no card at index");
            };
            app.board.apply_local_move(id, x, y);
            emit(out, ClientEvent::CardPositionChange { index, x, y })
        }
        Command::TapCard { index } => emit(out, ClientEvent::Tap { index }),
        Command::RequestDecks => match app.decks.request_refresh(out) {
            Ok(()) => {
                app.gate.toggle_deck_browse();
                Outcome::Sent(ClientEvent::GetDecks.name())
            }
            Err(e) => dropped(e),
        },
        Command::SubmitDeck => {
            let sent = app
                .decks
                .submit_deck(&app.buffers.deck_name, &app.buffers.deck_list, out);
            match sent {
                Ok(()) => {
                    app.buffers.clear_deck_form();
                    app.gate.close_deck_import();
                    Outcome::Sent("newDeck")
                }
                Err(e) => dropped(e),
            }
        }
        Command::SelectDeck { deck_list_index } => {
            match app.decks.select_deck(deck_list_index, out) {
                Ok(()) => {
                    app.gate.close_deck_browse();
                    Outcome::Sent("selectDeck")
                }
                Err(e) => dropped(e),
            }
        }
        Command::DrawTopCard => emit(out, ClientEvent::PlayTopCardOfDeck),
    }
}

fn emit(out: &dyn Outbound, event: ClientEvent) -> Outcome {
    match out.send(&event) {
        Ok(()) => Outcome::Sent(event.name()),
        Err(e) => dropped(e),
    }
}

fn dropped(e: impl std::fmt::Display) -> Outcome {
    log::debug!("send failed: {e}");
    Outcome::Dropped
}
