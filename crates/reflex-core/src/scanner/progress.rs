//! Progress reporting for a scan (processed / total, spinner).
//!
//! Workers call the reporter while holding the scan lock; the terminal
//! reporter additionally serializes its own writes so it is safe to share.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::state::ScanOutcome;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Snapshot of scan progress. `total` is fixed before workers start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub processed: usize,
    pub total: usize,
}

impl ScanProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.processed as f64 / self.total as f64).min(1.0)
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.processed % SPINNER.len()]
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }

    /// Single overwriting line, e.g. `"\rProgress: 40.0% - "`.
    pub fn render(&self) -> String {
        format!("\rProgress: {:.1}% {} ", self.percent(), self.spinner())
    }
}

/// Receives per-URL outcomes and progress updates from scan workers.
pub trait ProgressReporter: Sync {
    fn report(&self, progress: ScanProgress);

    fn outcome(&self, _url: &str, _outcome: ScanOutcome) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _progress: ScanProgress) {}
}

/// Writes outcome lines and an in-place progress line to a terminal-like writer.
#[derive(Debug)]
pub struct TerminalReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // Terminal output is best effort; a closed stdout must not stall workers.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<W: Write + Send> ProgressReporter for TerminalReporter<W> {
    fn report(&self, progress: ScanProgress) {
        let mut line = progress.render();
        if progress.is_complete() {
            line.push('\n');
        }
        self.write(&line);
    }

    fn outcome(&self, url: &str, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::Vulnerable => self.write(&format!("\r[Vulnerable]     {}\n", url)),
            ScanOutcome::NotVulnerable => self.write(&format!("\r[Not Vulnerable] {}\n", url)),
            ScanOutcome::FetchError => {}
        }
    }
}
