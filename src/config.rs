use anyhow::{anyhow, Result};
use clap::Parser;
use std::time::Duration;

use crate::connection::socket_endpoint;
use crate::constants::{app, board, logging, net};

/// cardtable - shared tabletop card board in the terminal
///
/// Connects to a board server and mirrors its cards, decks and errors.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "cardtable")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multiplayer card board client", long_about = None)]
pub struct CliArgs {
    /// Board server URL (ws, wss, http or https)
    #[arg(long, env = "CARDTABLE_SERVER_URL")]
    pub server_url: Option<String>,

    /// Socket.IO mount path on the server
    #[arg(long, env = "CARDTABLE_SOCKET_PATH")]
    pub socket_path: Option<String>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "CARDTABLE_RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// How long server error notices stay up, in milliseconds (500-60000)
    #[arg(long, env = "CARDTABLE_NOTICE_MS")]
    pub notice_ms: Option<u64>,

    /// Board pixels per terminal column (1-100)
    #[arg(long, env = "CARDTABLE_PX_PER_COL")]
    pub px_per_col: Option<u32>,

    /// Board pixels per terminal row (1-200)
    #[arg(long, env = "CARDTABLE_PX_PER_ROW")]
    pub px_per_row: Option<u32>,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, env = "CARDTABLE_LOG_FILE")]
    pub log_file: Option<String>,

    /// Log filter in env_logger syntax, e.g. "info" or "cardtable=debug"
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_url: String,
    pub socket_path: String,
    pub render_fps: u32,
    pub notice_ms: u64,
    pub px_per_col: u32,
    pub px_per_row: u32,
    pub log_file: String,
    pub log_level: String,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let server_url = args
        .server_url
        .unwrap_or_else(|| net::DEFAULT_SERVER_URL.to_string());
    validate_url(&server_url, "CARDTABLE_SERVER_URL")?;

    let socket_path = args
        .socket_path
        .unwrap_or_else(|| net::DEFAULT_SOCKET_PATH.to_string());
    if !socket_path.starts_with('/') {
        return Err(anyhow!("CARDTABLE_SOCKET_PATH must start with '/', got {socket_path:?}"));
    }

    let render_fps = args.render_fps.unwrap_or(app::DEFAULT_RENDER_FPS);
    let render_fps = validate_in_range(render_fps, 1, 120, "CARDTABLE_RENDER_FPS")?;

    let notice_ms = args.notice_ms.unwrap_or(app::NOTICE_DURATION_MS);
    let notice_ms = validate_in_range(notice_ms, 500, 60000, "CARDTABLE_NOTICE_MS")?;

    let px_per_col = args.px_per_col.unwrap_or(board::DEFAULT_PX_PER_COL);
    let px_per_col = validate_in_range(px_per_col, 1, 100, "CARDTABLE_PX_PER_COL")?;

    let px_per_row = args.px_per_row.unwrap_or(board::DEFAULT_PX_PER_ROW);
    let px_per_row = validate_in_range(px_per_row, 1, 200, "CARDTABLE_PX_PER_ROW")?;

    let log_file = args
        .log_file
        .unwrap_or_else(|| logging::DEFAULT_LOG_FILE.to_string());
    if log_file.trim().is_empty() {
        return Err(anyhow!("CARDTABLE_LOG_FILE cannot be empty"));
    }

    let log_level = args
        .log_level
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| logging::DEFAULT_LOG_LEVEL.to_string());

    Ok(Config {
        server_url,
        socket_path,
        render_fps,
        notice_ms,
        px_per_col,
        px_per_row,
        log_file,
        log_level,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    // Basic scheme validation
    if url.starts_with("ws://")
        || url.starts_with("wss://")
        || url.starts_with("http://")
        || url.starts_with("https://")
    {
        Ok(())
    } else {
        Err(anyhow!(
            "{name} must start with ws://, wss://, http://, or https://"
        ))
    }
}

impl Config {
    /// Websocket URL the transport dials.
    pub fn socket_endpoint(&self) -> Result<String> {
        Ok(socket_endpoint(&self.server_url, &self.socket_path)?)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub fn log_summary(&self) {
        log::info!("cardtable configuration:");
        log::info!("  Server: {}{}", self.server_url, self.socket_path);
        log::info!("  Render FPS: {}", self.render_fps);
        log::info!("  Notice: {}ms", self.notice_ms);
        log::info!("  Board scale: {}x{} px per cell", self.px_per_col, self.px_per_row);
    }
}
