//! Core types for batchrename.
//!
//! This crate holds the data model shared by the scanner, the rename engine
//! and the session controller: file entries and their identifiers, session
//! generations, thumbnails, the error taxonomy, name validation and the
//! session configuration.

mod config;
mod entry;
mod error;
mod thumbnail;
mod validate;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use entry::{EntryId, FileEntry, Generation, GenerationCounter, IMAGE_EXTENSIONS};
pub use error::{DecodeError, ScanError};
pub use thumbnail::{Thumbnail, ThumbnailResult};
pub use validate::{InvalidChar, RESERVED_CHARS, validate_name};
