//! Subscriber setup for `tracing`.
//!
//! `MINDTREE_LOG` takes a full filter directive (`mindtree=debug`,
//! `trace`, ...). Without it the level comes from the `-v` count.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MINDTREE_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; used while the terminal is in raw mode.
    File(PathBuf),
    Off,
}

/// Default directive for `-v` repeated `verbosity` times.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "mindtree=warn",
        1 => "mindtree=info",
        2 => "mindtree=debug",
        _ => "mindtree=trace",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber. Only the first call in a process has
/// any effect.
pub fn init(target: LogTarget, verbosity: u8) -> Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter(verbosity))
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init()
            .map_err(|e| anyhow!("failed to install logger: {e}")),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbosity))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("failed to install logger: {e}"))
        }
    }
}
