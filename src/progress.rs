//! Progress reporting
//!
//! The batch runner reports `(processed, total)` after every row through the
//! [`ProgressReporter`] trait. [`ConsoleProgress`] renders the classic
//! fixed-width bar re-drawn in place; [`NoOpProgress`] is the stub for
//! embedders that do not want console output.

use std::io::Write;

/// Number of bar segments the console window fits.
pub const DEFAULT_BAR_SEGMENTS: usize = 48;

/// Sink for per-row progress updates
pub trait ProgressReporter {
    /// Called after each processed row (and once before the first row with
    /// `processed == 0`).
    fn report(&mut self, processed: u64, total: u64);
}

/// Console progress bar, re-rendered in place
///
/// Renders `\r{pct}%\t[{bars}]\t{processed} / {total}` to stdout.
pub struct ConsoleProgress {
    segments: usize,
}

impl ConsoleProgress {
    /// Create a bar with the default segment count.
    pub fn new() -> Self {
        Self::with_segments(DEFAULT_BAR_SEGMENTS)
    }

    /// Create a bar with a custom segment count.
    pub fn with_segments(segments: usize) -> Self {
        Self { segments }
    }

    fn render(&self, processed: u64, total: u64) -> String {
        let percent = if total == 0 {
            100
        } else {
            (100 * processed / total) as usize
        };
        let filled = if percent == 0 {
            0
        } else {
            (self.segments * percent / 100).min(self.segments)
        };
        format!(
            "\r{}%\t[{}{}]\t{} / {}",
            percent,
            "=".repeat(filled),
            " ".repeat(self.segments - filled),
            processed,
            total
        )
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&mut self, processed: u64, total: u64) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(self.render(processed, total).as_bytes());
        let _ = out.flush();
    }
}

/// Progress sink that ignores every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn report(&mut self, _processed: u64, _total: u64) {}
}
