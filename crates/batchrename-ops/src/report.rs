//! Rename outcomes and batch report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use batchrename_core::EntryId;

use crate::plan::RejectReason;

/// Why one entry was not renamed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RenameFailure {
    #[error("Name contains a reserved character")]
    InvalidChar,

    #[error("Another entry in this batch uses the same name")]
    DuplicateInBatch,

    #[error("'{target}' already exists")]
    AlreadyExists { target: String },

    #[error("Rename failed: {message}")]
    Io { message: String },
}

impl From<RejectReason> for RenameFailure {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InvalidChar => Self::InvalidChar,
            RejectReason::DuplicateInBatch => Self::DuplicateInBatch,
        }
    }
}

/// Terminal result for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Renamed,
    Skipped,
    Failed(RenameFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub entry_id: EntryId,
    pub result: OutcomeKind,
}

/// Result of one rename batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameReport {
    /// Per-entry outcomes in id order.
    pub outcomes: Vec<RenameOutcome>,
    /// Number of entries renamed.
    pub renamed: usize,
    /// Number of entries that failed or were rejected.
    pub errors: usize,
}

impl RenameReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome and update the counters.
    pub fn record(&mut self, outcome: RenameOutcome) {
        match outcome.result {
            OutcomeKind::Renamed => self.renamed += 1,
            OutcomeKind::Failed(_) => self.errors += 1,
            OutcomeKind::Skipped => {}
        }
        self.outcomes.push(outcome);
    }

    /// Look up the outcome for one entry.
    pub fn outcome_for(&self, entry_id: EntryId) -> Option<&OutcomeKind> {
        self.outcomes
            .iter()
            .find(|o| o.entry_id == entry_id)
            .map(|o| &o.result)
    }

    /// Check if nothing failed.
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Get a human-readable summary of the batch.
    pub fn summary(&self) -> String {
        format!("Renamed: {}\nErrors: {}", self.renamed, self.errors)
    }
}
