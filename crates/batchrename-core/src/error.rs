//! Error types for scanning and previewing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a folder scan.
///
/// Entries discovered before the error stay valid; the scan just ends early.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The chosen path is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing failed for a reason that carries no I/O error.
    #[error("Listing {path} failed: {message}")]
    Interrupted { path: PathBuf, message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A thumbnail could not be produced for one file.
///
/// Terminal for that entry: the row simply shows no preview.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot preview {}: {message}", path.display())]
pub struct DecodeError {
    /// File that failed to decode.
    pub path: PathBuf,
    /// Human-readable reason.
    pub message: String,
}

impl DecodeError {
    /// Create a decode error for `path`.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
