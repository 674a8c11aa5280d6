//! Rename engine for batchrename.
//!
//! Renaming happens in two steps. [`build_plan`] turns the operator's
//! candidates into one [`RenameDecision`] per entry without touching the
//! filesystem; [`execute_plan`] then applies the decisions one by one, in id
//! order, re-checking the folder for collisions as it goes. A failed item
//! never stops the rest of the batch.

mod executor;
mod plan;
mod report;

pub use executor::execute_plan;
pub use plan::{RejectReason, RenameAction, RenameDecision, build_plan};
pub use report::{OutcomeKind, RenameFailure, RenameOutcome, RenameReport};
