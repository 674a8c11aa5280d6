//! Session loading progress.

use std::time::{Duration, Instant};

/// Progress of one folder load, as seen by the owner context.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Entries applied to the session so far.
    pub discovered: u64,
    /// Thumbnails delivered with a preview.
    pub thumbnails_ready: u64,
    /// Thumbnails that could not be decoded.
    pub thumbnails_failed: u64,
    /// Stale events dropped because they belonged to an older folder load.
    pub stale_discarded: u64,
    /// Whether the listing has ended (successfully or not).
    pub scan_done: bool,
    started: Instant,
    elapsed: Option<Duration>,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            discovered: 0,
            thumbnails_ready: 0,
            thumbnails_failed: 0,
            stale_discarded: 0,
            scan_done: false,
            started: Instant::now(),
            elapsed: None,
        }
    }

    pub fn record_entry(&mut self) {
        self.discovered += 1;
    }

    pub fn record_thumbnail(&mut self, decoded: bool) {
        if decoded {
            self.thumbnails_ready += 1;
        } else {
            self.thumbnails_failed += 1;
        }
    }

    pub fn record_stale(&mut self) {
        self.stale_discarded += 1;
    }

    /// Mark the listing as ended and freeze the elapsed time.
    pub fn finish_scan(&mut self) {
        self.scan_done = true;
        self.elapsed = Some(self.started.elapsed());
    }

    /// Time spent listing, or time since the load started while still listing.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }

    /// Thumbnails still expected for discovered entries.
    pub fn thumbnails_pending(&self) -> u64 {
        self.discovered
            .saturating_sub(self.thumbnails_ready + self.thumbnails_failed)
    }

    /// Whether nothing more is expected from the workers.
    pub fn is_settled(&self, expect_thumbnails: bool) -> bool {
        self.scan_done && (!expect_thumbnails || self.thumbnails_pending() == 0)
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}
