//! Session controller errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that keep the controller from starting work.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The thumbnail worker pool could not be created.
    #[error("Failed to start thumbnail workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The scan worker thread could not be spawned.
    #[error("Failed to start scanning {path}: {source}")]
    ScanThread {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
