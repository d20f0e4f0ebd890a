//! Application constants
//!
//! Centralized defaults, timing values and layout numbers used across the
//! engine and the terminal front-end.

/// Server connection defaults
pub mod net {
    /// Public board server
    pub const DEFAULT_SERVER_URL: &str = "wss://magic-together-sockets.dootlord.meme";

    /// Socket.IO mount path on the server
    pub const DEFAULT_SOCKET_PATH: &str = "/socket.io/";

    /// Engine.IO protocol revision spoken by the codec
    pub const ENGINE_IO_VERSION: u8 = 4;
}

/// Engine behavior constants
pub mod app {
    /// How long a server error notice stays visible (milliseconds)
    pub const NOTICE_DURATION_MS: u64 = 5000;

    /// Default render rate for the terminal front-end
    pub const DEFAULT_RENDER_FPS: u32 = 30;

    /// Double-click window used for tapping a card (milliseconds)
    pub const DOUBLE_CLICK_MS: u64 = 280;
}

/// Board-to-terminal mapping
pub mod board {
    /// Board pixels per terminal column
    pub const DEFAULT_PX_PER_COL: u32 = 10;

    /// Board pixels per terminal row
    pub const DEFAULT_PX_PER_ROW: u32 = 20;

    /// Card footprint in cells
    pub const CARD_WIDTH: u16 = 14;
    pub const CARD_HEIGHT: u16 = 4;
}

/// Logging defaults
pub mod logging {
    /// File the terminal build logs into (stderr would corrupt the TUI)
    pub const DEFAULT_LOG_FILE: &str = "cardtable.log";

    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
