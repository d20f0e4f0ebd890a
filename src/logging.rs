//! env_logger setup for the terminal build.

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};

/// Route all `log` output into `path`, appending. `filters` uses the
/// `RUST_LOG` syntax.
pub fn init(path: &str, filters: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {path}"))?;

    Builder::new()
        .parse_filters(filters)
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}
