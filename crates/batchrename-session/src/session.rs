//! State of one folder load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use batchrename_core::{EntryId, FileEntry, Generation, Thumbnail, ThumbnailResult, validate_name};
use batchrename_ops::{RenameDecision, RenameReport, build_plan, execute_plan};
use batchrename_scan::ScanProgress;

use crate::status::RowStatus;
use crate::update::ValidationEvent;

/// Preview state of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ThumbnailState {
    #[default]
    Pending,
    Ready(Thumbnail),
    /// Decoding failed; the row shows no preview.
    Unavailable,
}

/// Editable state attached to one entry.
#[derive(Debug, Clone, Default)]
pub struct RowState {
    /// Candidate base name exactly as typed.
    pub candidate: String,
    pub thumbnail: ThumbnailState,
    pub status: RowStatus,
}

/// Everything known about one folder load.
///
/// Entries are kept in id order; all other per-entry state is looked up by
/// id, never by position or arrival order.
#[derive(Debug)]
pub struct Session {
    generation: Generation,
    folder: PathBuf,
    entries: Vec<FileEntry>,
    rows: HashMap<EntryId, RowState>,
    progress: ScanProgress,
    scan_error: Option<String>,
}

impl Session {
    pub(crate) fn new(generation: Generation, folder: PathBuf) -> Self {
        Self {
            generation,
            folder,
            entries: Vec::new(),
            rows: HashMap::new(),
            progress: ScanProgress::new(),
            scan_error: None,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Entries discovered so far, in id order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn row(&self, id: EntryId) -> Option<&RowState> {
        self.rows.get(&id)
    }

    /// Entries paired with their row state, in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&FileEntry, &RowState)> {
        self.entries
            .iter()
            .filter_map(|entry| self.rows.get(&entry.id).map(|row| (entry, row)))
    }

    pub fn progress(&self) -> &ScanProgress {
        &self.progress
    }

    /// Message of the error that ended the listing early, if any.
    pub fn scan_error(&self) -> Option<&str> {
        self.scan_error.as_deref()
    }

    pub(crate) fn progress_mut(&mut self) -> &mut ScanProgress {
        &mut self.progress
    }

    pub(crate) fn push_entry(&mut self, entry: FileEntry) {
        if self.entries.last().is_some_and(|last| last.id >= entry.id) {
            debug!(entry = %entry.id, "ignoring out-of-order discovery");
            return;
        }
        self.rows.insert(entry.id, RowState::default());
        self.entries.push(entry);
        self.progress.record_entry();
    }

    /// Store a decode result on its row. Returns the preview to show, or
    /// `None` when no row with that id exists.
    pub(crate) fn set_thumbnail(&mut self, result: ThumbnailResult) -> Option<Option<Thumbnail>> {
        let Some(row) = self.rows.get_mut(&result.entry_id) else {
            debug!(entry = %result.entry_id, "thumbnail for unknown entry");
            return None;
        };

        let preview = result.into_preview().filter(Thumbnail::is_well_formed);
        self.progress.record_thumbnail(preview.is_some());
        row.thumbnail = match &preview {
            Some(thumbnail) => ThumbnailState::Ready(thumbnail.clone()),
            None => ThumbnailState::Unavailable,
        };
        Some(preview)
    }

    pub(crate) fn finish_scan(&mut self, error: Option<String>) {
        self.progress.finish_scan();
        self.scan_error = error;
    }

    /// Replace the candidate of one row and validate it.
    ///
    /// Returns `None` if no row has that id.
    pub fn set_candidate(&mut self, id: EntryId, text: &str) -> Option<ValidationEvent> {
        let row = self.rows.get_mut(&id)?;
        row.candidate = text.to_string();

        let invalid = validate_name(text).is_err();
        row.status = if invalid {
            RowStatus::InvalidChar
        } else {
            RowStatus::Empty
        };

        Some(ValidationEvent {
            entry_id: id,
            invalid,
            char_count: text.chars().count(),
        })
    }

    /// Fill candidates from pasted text, one line per row in display order.
    ///
    /// Lines may end in `\n`, `\r\n` or a bare `\r`. They are trimmed and
    /// blank lines dropped. Extra lines are ignored; rows past the last line
    /// keep their candidates.
    pub fn paste_names(&mut self, text: &str) -> Vec<ValidationEvent> {
        let ids: Vec<EntryId> = self.entries.iter().map(|e| e.id).collect();
        let lines = text
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty());

        ids.into_iter()
            .zip(lines)
            .filter_map(|(id, line)| self.set_candidate(id, line))
            .collect()
    }

    /// Empty every candidate.
    pub fn clear_candidates(&mut self) -> Vec<ValidationEvent> {
        let ids: Vec<EntryId> = self.entries.iter().map(|e| e.id).collect();
        ids.into_iter()
            .filter_map(|id| self.set_candidate(id, ""))
            .collect()
    }

    /// Snapshot of the current candidates, keyed by entry id.
    pub fn candidates(&self) -> HashMap<EntryId, String> {
        self.rows
            .iter()
            .filter(|(_, row)| !row.candidate.is_empty())
            .map(|(id, row)| (*id, row.candidate.clone()))
            .collect()
    }

    /// Plan a rename of the entries present right now, without touching files.
    pub fn plan(&self) -> Vec<RenameDecision> {
        build_plan(&self.entries, &self.candidates())
    }

    /// Plan and execute a rename of the entries present right now.
    ///
    /// Row statuses are updated from the outcomes; skipped rows keep theirs.
    pub fn rename_all(&mut self) -> RenameReport {
        let plan = self.plan();
        let report = execute_plan(&mut self.entries, &plan);

        for outcome in &report.outcomes {
            if let (Some(status), Some(row)) = (
                RowStatus::from_outcome(&outcome.result),
                self.rows.get_mut(&outcome.entry_id),
            ) {
                row.status = status;
            }
        }

        report
    }
}
