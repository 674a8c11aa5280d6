//! Per-row status text.

use strum::Display;

use batchrename_ops::{OutcomeKind, RenameFailure};

/// Status shown next to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum RowStatus {
    #[default]
    #[strum(to_string = "")]
    Empty,
    #[strum(to_string = "Invalid Char!")]
    InvalidChar,
    #[strum(to_string = "File Exists!")]
    FileExists,
    #[strum(to_string = "Success")]
    Success,
    #[strum(to_string = "Error")]
    Error,
}

impl RowStatus {
    /// Status for a rename outcome, or `None` when the row should keep its
    /// current status (skipped entries).
    pub fn from_outcome(outcome: &OutcomeKind) -> Option<Self> {
        match outcome {
            OutcomeKind::Renamed => Some(Self::Success),
            OutcomeKind::Skipped => None,
            OutcomeKind::Failed(RenameFailure::InvalidChar) => Some(Self::InvalidChar),
            OutcomeKind::Failed(RenameFailure::AlreadyExists { .. }) => Some(Self::FileExists),
            OutcomeKind::Failed(RenameFailure::DuplicateInBatch | RenameFailure::Io { .. }) => {
                Some(Self::Error)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::InvalidChar | Self::FileExists | Self::Error)
    }
}
