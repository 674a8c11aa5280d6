//! Worker → owner handoff events.

use tokio::sync::mpsc;

use batchrename_core::{FileEntry, Generation, ScanError, ThumbnailResult};

/// An event produced by a scan or decode worker.
#[derive(Debug)]
pub enum SessionEvent {
    /// A file was discovered. Sent in ascending id order.
    Discovered {
        generation: Generation,
        entry: FileEntry,
    },
    /// A thumbnail finished (or failed) decoding. Arrives in any order.
    Thumbnail {
        generation: Generation,
        result: ThumbnailResult,
    },
    /// The listing completed.
    ScanFinished {
        generation: Generation,
        discovered: usize,
    },
    /// The listing stopped early; `discovered` entries were sent before it.
    ScanFailed {
        generation: Generation,
        discovered: usize,
        error: ScanError,
    },
}

impl SessionEvent {
    /// The folder load this event belongs to.
    pub fn generation(&self) -> Generation {
        match self {
            Self::Discovered { generation, .. }
            | Self::Thumbnail { generation, .. }
            | Self::ScanFinished { generation, .. }
            | Self::ScanFailed { generation, .. } => *generation,
        }
    }
}

/// Create the bounded handoff queue.
pub fn event_channel(
    capacity: usize,
) -> (mpsc::Sender<SessionEvent>, mpsc::Receiver<SessionEvent>) {
    mpsc::channel(capacity)
}
