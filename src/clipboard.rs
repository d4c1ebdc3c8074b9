use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// How long an entry stays marked as copied.
pub const COPIED_INDICATOR: Duration = Duration::from_millis(2000);

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no clipboard tool available (tried {0})")]
    Unavailable(String),
    #[error("clipboard tool `{tool}` failed: {reason}")]
    Failed { tool: String, reason: String },
}

/// Something text can be copied into.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<T: ClipboardSink + ?Sized> ClipboardSink for Box<T> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Pipes text into the platform's clipboard command.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard;

const NO_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];
const XSEL_ARGS: &[&str] = &["--clipboard", "--input"];

impl SystemClipboard {
    fn candidates() -> &'static [(&'static str, &'static [&'static str])] {
        if cfg!(target_os = "macos") {
            &[("pbcopy", NO_ARGS)]
        } else if cfg!(target_os = "windows") {
            &[("clip", NO_ARGS)]
        } else {
            &[
                ("wl-copy", NO_ARGS),
                ("xclip", XCLIP_ARGS),
                ("xsel", XSEL_ARGS),
            ]
        }
    }

    fn run(tool: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let failed = |reason: String| ClipboardError::Failed {
            tool: tool.to_string(),
            reason,
        };
        let mut child = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }
        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        if !status.success() {
            return Err(failed(format!("exited with {status}")));
        }
        Ok(())
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut tried = Vec::new();
        for (tool, args) in Self::candidates() {
            match Self::run(tool, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(%e, "clipboard tool unusable");
                    tried.push(*tool);
                }
            }
        }
        Err(ClipboardError::Unavailable(tried.join(", ")))
    }
}

/// The "just copied" marker and when it lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CopiedMarker {
    entry: usize,
    expires_at: Instant,
}

/// Copies swatch values and remembers which entry was copied last.
///
/// The marker is owned by the service; a new copy replaces it outright, so
/// an older copy's expiry can never clear or mislabel a newer one.
#[derive(Debug)]
pub struct ClipboardService<S> {
    sink: S,
    marker: Option<CopiedMarker>,
    hold: Duration,
}

impl<S: ClipboardSink> ClipboardService<S> {
    pub fn new(sink: S) -> Self {
        Self::with_hold(sink, COPIED_INDICATOR)
    }

    pub fn with_hold(sink: S, hold: Duration) -> Self {
        Self {
            sink,
            marker: None,
            hold,
        }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    /// Copy `text` on behalf of `entry`. Returns whether the copy happened.
    pub fn copy(&mut self, text: &str, entry: usize) -> bool {
        self.copy_at(text, entry, Instant::now())
    }

    /// Same as [`copy`](Self::copy) with an explicit clock reading.
    ///
    /// Failures are logged and never mark `entry`.
    pub fn copy_at(&mut self, text: &str, entry: usize, now: Instant) -> bool {
        match self.sink.write_text(text) {
            Ok(()) => {
                self.marker = Some(CopiedMarker {
                    entry,
                    expires_at: now + self.hold,
                });
                true
            }
            Err(e) => {
                warn!(%e, entry, "copy to clipboard failed");
                false
            }
        }
    }

    /// The entry currently shown as copied, if any.
    pub fn copied(&self) -> Option<usize> {
        self.copied_at(Instant::now())
    }

    pub fn copied_at(&self, now: Instant) -> Option<usize> {
        self.marker
            .filter(|marker| now < marker.expires_at)
            .map(|marker| marker.entry)
    }

    /// Drop the marker once it has lapsed. Returns true if it was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.marker {
            Some(marker) if now >= marker.expires_at => {
                self.marker = None;
                true
            }
            _ => false,
        }
    }

    /// Forget the marker immediately.
    pub fn clear(&mut self) {
        self.marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Vec<String>,
        broken: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.broken {
                return Err(ClipboardError::Unavailable("memory".to_string()));
            }
            self.contents.push(text.to_string());
            Ok(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn copy_writes_text_and_marks_entry() {
        let mut service = ClipboardService::new(MemoryClipboard::default());
        let t0 = Instant::now();

        assert!(service.copy_at("#ff0000", 2, t0));

        assert_eq!(service.sink().contents, ["#ff0000"]);
        assert_eq!(service.copied_at(t0), Some(2));
    }

    #[test]
    fn marker_lapses_after_two_seconds() {
        let mut service = ClipboardService::new(MemoryClipboard::default());
        let t0 = Instant::now();
        service.copy_at("#ff0000", 0, t0);

        assert_eq!(service.copied_at(t0 + ms(1999)), Some(0));
        assert_eq!(service.copied_at(t0 + ms(2000)), None);
        assert!(service.tick(t0 + ms(2000)));
        assert_eq!(service.copied_at(t0 + ms(10)), None, "tick drops the marker");
    }

    #[test]
    fn recopy_restarts_the_timer_for_the_new_entry() {
        let mut service = ClipboardService::new(MemoryClipboard::default());
        let t0 = Instant::now();
        service.copy_at("#ff0000", 0, t0);
        service.copy_at("#00ff00", 1, t0 + ms(1500));

        // The first copy's deadline passes without touching the second marker.
        assert!(!service.tick(t0 + ms(2100)));
        assert_eq!(service.copied_at(t0 + ms(2100)), Some(1));
        assert_eq!(service.copied_at(t0 + ms(3499)), Some(1));
        assert_eq!(service.copied_at(t0 + ms(3500)), None);
    }

    #[test]
    fn failed_copy_shows_no_marker() {
        let sink = MemoryClipboard {
            broken: true,
            ..Default::default()
        };
        let mut service = ClipboardService::new(sink);
        let t0 = Instant::now();

        assert!(!service.copy_at("#ff0000", 3, t0));
        assert_eq!(service.copied_at(t0), None);
    }

    #[test]
    fn failed_copy_keeps_previous_marker() {
        let mut service = ClipboardService::new(MemoryClipboard::default());
        let t0 = Instant::now();
        service.copy_at("#ff0000", 0, t0);
        service.sink.broken = true;

        service.copy_at("#00ff00", 1, t0 + ms(100));

        assert_eq!(service.copied_at(t0 + ms(100)), Some(0));
    }

    #[test]
    fn clear_drops_marker() {
        let mut service = ClipboardService::new(MemoryClipboard::default());
        service.copy("#123456", 4);
        service.clear();
        assert_eq!(service.copied(), None);
    }
}
