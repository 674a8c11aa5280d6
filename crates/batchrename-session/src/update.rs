//! Notifications handed to the presentation layer.

use batchrename_core::{EntryId, ScanError, Thumbnail};

/// Something the presentation should reflect after a [`poll`].
///
/// [`poll`]: crate::SessionController::poll
#[derive(Debug)]
pub enum SessionUpdate {
    /// A new row is available.
    EntryDiscovered { id: EntryId, current_name: String },
    /// A row's preview is known; `None` means it cannot be shown.
    ThumbnailReady {
        entry_id: EntryId,
        thumbnail: Option<Thumbnail>,
    },
    /// The folder was listed completely.
    ScanFinished { discovered: usize },
    /// Listing stopped part-way; the rows already shown stay usable.
    ScanIncomplete { discovered: usize, error: ScanError },
    /// The folder could not be read at all.
    FolderUnreadable { error: ScanError },
}

/// Live feedback for one edited candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationEvent {
    pub entry_id: EntryId,
    /// The candidate contains a reserved character.
    pub invalid: bool,
    /// Number of characters typed, untrimmed.
    pub char_count: usize,
}
