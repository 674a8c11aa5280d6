//! Folder scanning and thumbnail pipeline for batchrename.
//!
//! Everything in this crate runs off the owner context. Workers talk to the
//! owner through a single bounded queue of [`SessionEvent`]s, each tagged with
//! the [`Generation`] of the folder load that started it.
//!
//! # Example
//!
//! ```rust,no_run
//! use batchrename_scan::DirectoryScanner;
//!
//! for entry in DirectoryScanner::new().scan("/path/to/photos") {
//!     match entry {
//!         Ok(entry) => println!("{} {}", entry.id, entry.current_name),
//!         Err(e) => eprintln!("scan stopped: {e}"),
//!     }
//! }
//! ```

mod event;
mod progress;
mod scanner;
mod thumbnail;

pub use event::{SessionEvent, event_channel};
pub use progress::ScanProgress;
pub use scanner::{DirectoryScanner, Scan, spawn_scan};
pub use thumbnail::{ThumbnailPipeline, decode_thumbnail};

// Re-export core types for convenience
pub use batchrename_core::{
    DecodeError, EntryId, FileEntry, Generation, GenerationCounter, ScanError, Thumbnail,
    ThumbnailResult,
};
