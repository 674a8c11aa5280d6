//! Sequential rename execution.

use std::collections::HashMap;
use std::fs;

use tracing::{info, warn};

use batchrename_core::{EntryId, FileEntry};

use crate::plan::{RenameAction, RenameDecision};
use crate::report::{OutcomeKind, RenameFailure, RenameOutcome, RenameReport};

/// Apply `plan` to the files behind `entries`.
///
/// Decisions run one at a time in ascending id order. Each rename re-checks
/// the folder for an existing target right before moving the file, since
/// earlier renames in the same batch (or other processes) may have taken the
/// name since the plan was built. Renamed entries are updated in place;
/// skipped and rejected entries are never touched. Failures are recorded and
/// the batch carries on.
pub fn execute_plan(entries: &mut [FileEntry], plan: &[RenameDecision]) -> RenameReport {
    let index: HashMap<EntryId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.id, i))
        .collect();

    let mut ordered: Vec<&RenameDecision> = plan.iter().collect();
    ordered.sort_by_key(|decision| decision.entry_id);

    let mut report = RenameReport::new();

    for decision in ordered {
        let result = match &decision.action {
            RenameAction::Skip => OutcomeKind::Skipped,
            RenameAction::Reject(reason) => OutcomeKind::Failed((*reason).into()),
            RenameAction::Rename { target_name } => match index.get(&decision.entry_id) {
                Some(&i) => rename_entry(&mut entries[i], target_name),
                None => OutcomeKind::Failed(RenameFailure::Io {
                    message: format!("entry {} is not part of this session", decision.entry_id),
                }),
            },
        };

        report.record(RenameOutcome {
            entry_id: decision.entry_id,
            result,
        });
    }

    info!(
        renamed = report.renamed,
        errors = report.errors,
        "rename batch finished"
    );

    report
}

/// Rename one file inside its folder.
fn rename_entry(entry: &mut FileEntry, target_name: &str) -> OutcomeKind {
    let target = entry.folder().join(target_name);

    // symlink_metadata so a dangling link still counts as taken
    if fs::symlink_metadata(&target).is_ok() {
        warn!(entry = %entry.id, target = %target.display(), "target already exists");
        return OutcomeKind::Failed(RenameFailure::AlreadyExists {
            target: target_name.to_string(),
        });
    }

    match fs::rename(&entry.source_path, &target) {
        Ok(()) => {
            info!(
                entry = %entry.id,
                from = %entry.current_name,
                to = target_name,
                "renamed"
            );
            entry.set_name(target_name);
            OutcomeKind::Renamed
        }
        Err(e) => {
            warn!(entry = %entry.id, source = %entry.source_path.display(), error = %e, "rename failed");
            OutcomeKind::Failed(RenameFailure::Io {
                message: e.to_string(),
            })
        }
    }
}
