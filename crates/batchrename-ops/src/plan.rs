//! Rename plan construction.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use batchrename_core::{EntryId, FileEntry, validate_name};

/// Why the plan refuses to rename an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The candidate contains a reserved character.
    InvalidChar,
    /// Another entry in the batch asks for the same name.
    DuplicateInBatch,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChar => write!(f, "Invalid character"),
            Self::DuplicateInBatch => write!(f, "Duplicate name in batch"),
        }
    }
}

/// What to do with one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameAction {
    /// Nothing to do: no candidate, or the name would not change.
    Skip,
    /// Rename to `target_name` (base name plus original extension).
    Rename { target_name: String },
    /// Refuse the candidate.
    Reject(RejectReason),
}

/// The plan's verdict for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameDecision {
    pub entry_id: EntryId,
    pub action: RenameAction,
}

impl RenameDecision {
    pub fn is_rename(&self) -> bool {
        matches!(self.action, RenameAction::Rename { .. })
    }
}

/// Per-entry state while the plan is being built.
enum Staged<'a> {
    Decided(RenameAction),
    Pending(&'a str),
}

/// Build the rename plan for `entries`.
///
/// Produces one decision per entry, in the order of `entries`. Candidates are
/// trimmed before use. When two or more entries ask for the same base name,
/// every one of them is rejected. The filesystem is not consulted.
pub fn build_plan(
    entries: &[FileEntry],
    candidates: &HashMap<EntryId, String>,
) -> Vec<RenameDecision> {
    let staged: Vec<(EntryId, Staged<'_>, &FileEntry)> = entries
        .iter()
        .map(|entry| {
            let candidate = candidates
                .get(&entry.id)
                .map(|c| c.trim())
                .unwrap_or_default();

            let stage = if candidate.is_empty()
                || entry.full_name_for(candidate) == entry.current_name.as_str()
            {
                Staged::Decided(RenameAction::Skip)
            } else if validate_name(candidate).is_err() {
                Staged::Decided(RenameAction::Reject(RejectReason::InvalidChar))
            } else {
                Staged::Pending(candidate)
            };

            (entry.id, stage, entry)
        })
        .collect();

    let occurrences: HashMap<&str, usize> = staged
        .iter()
        .filter_map(|(_, stage, _)| match stage {
            Staged::Pending(candidate) => Some(*candidate),
            Staged::Decided(_) => None,
        })
        .counts();

    let plan: Vec<RenameDecision> = staged
        .into_iter()
        .map(|(entry_id, stage, entry)| {
            let action = match stage {
                Staged::Decided(action) => action,
                Staged::Pending(candidate) if occurrences[candidate] > 1 => {
                    RenameAction::Reject(RejectReason::DuplicateInBatch)
                }
                Staged::Pending(candidate) => RenameAction::Rename {
                    target_name: entry.full_name_for(candidate),
                },
            };
            RenameDecision { entry_id, action }
        })
        .collect();

    debug!(
        entries = plan.len(),
        renames = plan.iter().filter(|d| d.is_rename()).count(),
        "built rename plan"
    );

    plan
}
