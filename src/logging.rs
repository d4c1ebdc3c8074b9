use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Stdout carries only exported content, so the CLI logs to stderr.
    Stderr,
    /// The TUI owns the terminal; its logs are appended to a file instead.
    File(PathBuf),
}

/// Filter used when `RUST_LOG` is not set.
///
/// Other crates stay at `warn`; the `-v` count raises this crate's level.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,chromapick={level}")
}

pub fn log_target(tui: bool) -> LogTarget {
    if tui {
        LogTarget::File(std::env::temp_dir().join("chromapick.log"))
    } else {
        LogTarget::Stderr
    }
}

fn open_log_file(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber.
pub fn init(verbosity: u8, tui: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A second init (e.g. from tests) is harmless.
    match log_target(tui) {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
        }
        LogTarget::File(path) => {
            // Never fall back to stderr here: it would draw over the UI.
            let Some(file) = open_log_file(&path) else {
                return;
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
    }
}
