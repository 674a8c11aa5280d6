//! Owner-context session controller for batchrename.
//!
//! A [`SessionController`] is driven from a single thread (the one that owns
//! the presentation). It starts folder loads, drains worker results with a
//! non-blocking [`SessionController::poll`], and runs the operator's actions:
//! editing, pasting and clearing candidate names, previewing the plan and
//! renaming. Loading a new folder replaces the [`Session`] wholesale; results
//! still in flight for the old one are discarded by generation.

mod controller;
mod error;
mod session;
mod status;
mod update;

pub use controller::SessionController;
pub use error::SessionError;
pub use session::{RowState, Session, ThumbnailState};
pub use status::RowStatus;
pub use update::{SessionUpdate, ValidationEvent};

pub use batchrename_core::{EntryId, FileEntry, Generation, SessionConfig, Thumbnail};
pub use batchrename_ops::{RenameDecision, RenameReport};
pub use batchrename_scan::ScanProgress;
