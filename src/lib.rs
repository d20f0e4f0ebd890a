//! cardtable - client engine for a shared tabletop card board
//!
//! Keeps a local mirror of a server-authoritative board (cards, saved decks,
//! active-deck counter) in sync over one Socket.IO websocket, and turns user
//! intents into outbound board messages.
//!
//! ## Architecture
//!
//! - [`connection`]: handler table, channel lifecycle and outbound sends
//! - `transport` / [`socketio`]: the websocket task and its wire codec
//! - [`board`], [`decks`], [`input`], [`notice`]: client state
//! - [`commands`]: intent dispatch through the input gate
//! - [`ui`]: ratatui rendering for the terminal binary
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features native -- --server-url wss://board.example
//! ```

// Core modules
pub mod config;
pub mod constants;
pub mod protocol;
pub mod types;

// Wire
pub mod connection;
pub mod socketio;
mod transport;

// Client state
pub mod app;
pub mod board;
pub mod commands;
pub mod decks;
pub mod input;
pub mod notice;

// UI core (layout math shared by drawing and mouse handling)
pub mod ui_core;
pub mod ui;

pub mod logging;

// Utility modules
pub mod util;

// Re-export commonly used types
pub use app::{App, KeyOutcome};
pub use commands::{Command, Outcome};
pub use config::Config;
pub use connection::{Connection, ConnectionError, Outbound};
pub use protocol::ClientEvent;
pub use types::{Card, DeckInfo, Frame};
