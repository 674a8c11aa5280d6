//! Single-folder image scanner.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use batchrename_core::{EntryId, FileEntry, Generation, GenerationCounter, ScanError};

use crate::event::SessionEvent;
use crate::thumbnail::ThumbnailPipeline;

/// Lists the eligible image files of one folder (non-recursive).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScanner;

impl DirectoryScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Start a lazy scan of `folder`.
    ///
    /// Nothing touches the filesystem until the first call to `next()`.
    pub fn scan(&self, folder: impl Into<PathBuf>) -> Scan {
        Scan {
            folder: folder.into(),
            state: ScanState::Pending,
        }
    }
}

/// Finite, non-restartable sequence of discovered entries.
///
/// Yields entries with ids 1..N in filename order. When the listing breaks
/// part-way, the entries gathered before the failure come first, followed by
/// a single trailing error.
#[derive(Debug)]
pub struct Scan {
    folder: PathBuf,
    state: ScanState,
}

#[derive(Debug)]
enum ScanState {
    Pending,
    Listed {
        names: std::vec::IntoIter<String>,
        next_id: u64,
        error: Option<ScanError>,
    },
    Done,
}

impl Scan {
    /// The folder being scanned.
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl Iterator for Scan {
    type Item = Result<FileEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                ScanState::Pending => {
                    let (names, error) = list_images(&self.folder);
                    self.state = ScanState::Listed {
                        names: names.into_iter(),
                        next_id: 1,
                        error,
                    };
                }
                ScanState::Listed {
                    names,
                    next_id,
                    error,
                } => {
                    if let Some(name) = names.next() {
                        let id = EntryId::new(*next_id);
                        *next_id += 1;
                        return Some(Ok(FileEntry::new(id, &self.folder, &name)));
                    }
                    let error = error.take();
                    self.state = ScanState::Done;
                    return error.map(Err);
                }
                ScanState::Done => return None,
            }
        }
    }
}

/// Read the folder and return the sorted eligible names plus any error that
/// cut the listing short.
fn list_images(folder: &Path) -> (Vec<String>, Option<ScanError>) {
    match std::fs::metadata(folder) {
        Ok(metadata) if !metadata.is_dir() => {
            return (
                Vec::new(),
                Some(ScanError::NotADirectory {
                    path: folder.to_path_buf(),
                }),
            );
        }
        Ok(_) => {}
        Err(e) => return (Vec::new(), Some(ScanError::io(folder, e))),
    }

    // Surface permission problems with their proper kind before jwalk wraps them
    if let Err(e) = std::fs::read_dir(folder) {
        return (Vec::new(), Some(ScanError::io(folder, e)));
    }

    let walker = WalkDir::new(folder)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(1)
        .max_depth(1);

    let mut names = Vec::new();
    let mut error = None;

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| folder.to_path_buf());
                error = Some(ScanError::Interrupted {
                    path,
                    message: err.to_string(),
                });
                break;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        if !FileEntry::is_image_name(name) {
            continue;
        }

        // Links count only when they resolve to a regular file
        if file_type.is_symlink() && !entry.path().is_file() {
            continue;
        }

        names.push(name.to_string());
    }

    names.sort();
    (names, error)
}

/// Run a scan of `folder` on a dedicated worker thread.
///
/// Every entry is sent as [`SessionEvent::Discovered`] and then handed to the
/// thumbnail pipeline, if any. The worker stops as soon as `generation` is no
/// longer current or the queue is closed.
pub fn spawn_scan(
    folder: PathBuf,
    generation: Generation,
    generations: GenerationCounter,
    tx: mpsc::Sender<SessionEvent>,
    pipeline: Option<ThumbnailPipeline>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("batchrename-scan".into())
        .spawn(move || run_scan(folder, generation, generations, tx, pipeline))
}

fn run_scan(
    folder: PathBuf,
    generation: Generation,
    generations: GenerationCounter,
    tx: mpsc::Sender<SessionEvent>,
    pipeline: Option<ThumbnailPipeline>,
) {
    let mut discovered = 0;
    let scan = DirectoryScanner::new().scan(&folder);
    debug!(%generation, folder = %scan.folder().display(), "listing folder");

    for item in scan {
        if !generations.is_current(generation) {
            debug!(%generation, "scan superseded by a newer folder load");
            return;
        }

        match item {
            Ok(entry) => {
                discovered += 1;
                let event = SessionEvent::Discovered {
                    generation,
                    entry: entry.clone(),
                };
                if tx.blocking_send(event).is_err() {
                    return;
                }
                if let Some(pipeline) = &pipeline {
                    pipeline.submit(generation, &entry);
                }
            }
            Err(error) => {
                warn!(%generation, folder = %folder.display(), %error, "scan stopped early");
                let _ = tx.blocking_send(SessionEvent::ScanFailed {
                    generation,
                    discovered,
                    error,
                });
                return;
            }
        }
    }

    info!(%generation, folder = %folder.display(), discovered, "scan finished");
    let _ = tx.blocking_send(SessionEvent::ScanFinished {
        generation,
        discovered,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_folder() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("b.jpg"), "b").unwrap();
        fs::write(root.join("a.PNG"), "a").unwrap();
        fs::write(root.join("Z.gif"), "z").unwrap();
        fs::write(root.join("d.webp"), "d").unwrap();
        fs::write(root.join("notes.txt"), "not an image").unwrap();
        fs::write(root.join("no_extension"), "x").unwrap();
        fs::create_dir(root.join("folder.jpg")).unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/inner.png"), "inner").unwrap();

        temp
    }

    fn names(temp: &TempDir) -> Vec<(u64, String)> {
        DirectoryScanner::new()
            .scan(temp.path())
            .map(|e| {
                let e = e.unwrap();
                (e.id.0, e.current_name.to_string())
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let temp = create_test_folder();
        assert_eq!(
            names(&temp),
            vec![
                (1, "Z.gif".to_string()),
                (2, "a.PNG".to_string()),
                (3, "b.jpg".to_string()),
                (4, "d.webp".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_is_deterministic() {
        let temp = create_test_folder();
        assert_eq!(names(&temp), names(&temp));
    }

    #[test]
    fn test_scan_entries_carry_paths() {
        let temp = create_test_folder();
        let entry = DirectoryScanner::new()
            .scan(temp.path())
            .nth(2)
            .unwrap()
            .unwrap();
        assert_eq!(entry.source_path, temp.path().join("b.jpg"));
        assert_eq!(entry.extension, ".jpg");
    }

    #[test]
    fn test_scan_missing_folder() {
        let temp = TempDir::new().unwrap();
        let mut scan = DirectoryScanner::new().scan(temp.path().join("gone"));
        assert!(matches!(scan.next(), Some(Err(ScanError::NotFound { .. }))));
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_scan_file_is_not_a_folder() {
        let temp = create_test_folder();
        let mut scan = DirectoryScanner::new().scan(temp.path().join("b.jpg"));
        assert!(matches!(
            scan.next(),
            Some(Err(ScanError::NotADirectory { .. }))
        ));
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_scan_yields_partial_entries_then_error() {
        let mut scan = Scan {
            folder: PathBuf::from("/photos"),
            state: ScanState::Listed {
                names: vec!["a.jpg".to_string(), "b.png".to_string()].into_iter(),
                next_id: 1,
                error: Some(ScanError::Interrupted {
                    path: PathBuf::from("/photos"),
                    message: "device went away".to_string(),
                }),
            },
        };

        let a = scan.next().unwrap().unwrap();
        assert_eq!((a.id.0, a.current_name.as_str()), (1, "a.jpg"));
        assert_eq!(a.folder(), scan.folder());
        let b = scan.next().unwrap().unwrap();
        assert_eq!((b.id.0, b.current_name.as_str()), (2, "b.png"));
        assert!(matches!(
            scan.next(),
            Some(Err(ScanError::Interrupted { .. }))
        ));
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_scan_lists_dot_names() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".png"), "p").unwrap();
        fs::write(temp.path().join("a.png"), "a").unwrap();

        let listed: Vec<_> = DirectoryScanner::new()
            .scan(temp.path())
            .map(|e| e.unwrap().current_name.to_string())
            .collect();
        assert_eq!(listed, vec![".png", "a.png"]);
    }

    #[test]
    fn test_scan_empty_folder() {
        let temp = TempDir::new().unwrap();
        assert_eq!(DirectoryScanner::new().scan(temp.path()).count(), 0);
    }

    #[test]
    fn test_spawn_scan_sends_entries_in_order() {
        let temp = create_test_folder();
        let generations = GenerationCounter::new();
        let generation = generations.advance();
        let (tx, mut rx) = crate::event_channel(2);

        let handle = spawn_scan(
            temp.path().to_path_buf(),
            generation,
            generations,
            tx,
            None,
        )
        .unwrap();

        let mut ids = Vec::new();
        let mut finished = None;
        while let Some(event) = rx.blocking_recv() {
            assert_eq!(event.generation(), generation);
            match event {
                SessionEvent::Discovered { entry, .. } => ids.push(entry.id.0),
                SessionEvent::ScanFinished { discovered, .. } => finished = Some(discovered),
                other => panic!("unexpected event {other:?}"),
            }
        }
        handle.join().unwrap();

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(finished, Some(4));
    }

    #[test]
    fn test_spawn_scan_reports_unreadable_folder() {
        let temp = TempDir::new().unwrap();
        let generations = GenerationCounter::new();
        let generation = generations.advance();
        let (tx, mut rx) = crate::event_channel(4);

        spawn_scan(temp.path().join("missing"), generation, generations, tx, None)
            .unwrap()
            .join()
            .unwrap();

        match rx.blocking_recv() {
            Some(SessionEvent::ScanFailed {
                discovered, error, ..
            }) => {
                assert_eq!(discovered, 0);
                assert!(matches!(error, ScanError::NotFound { .. }));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_spawn_scan_stops_when_superseded() {
        let temp = create_test_folder();
        let generations = GenerationCounter::new();
        let stale = generations.advance();
        generations.advance();
        let (tx, mut rx) = crate::event_channel(8);

        spawn_scan(temp.path().to_path_buf(), stale, generations, tx, None)
            .unwrap()
            .join()
            .unwrap();

        assert!(rx.blocking_recv().is_none());
    }
}
