//! Thumbnail decode pipeline.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use image::ImageReader;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use batchrename_core::{
    DecodeError, FileEntry, Generation, GenerationCounter, SessionConfig, Thumbnail,
    ThumbnailResult,
};

use crate::event::SessionEvent;

/// Decodes previews on a worker pool, one independent job per entry.
///
/// Results go back through the session queue as [`SessionEvent::Thumbnail`]
/// in whatever order the decodes finish.
#[derive(Clone)]
pub struct ThumbnailPipeline {
    pool: Arc<ThreadPool>,
    bounds: (u32, u32),
    generations: GenerationCounter,
    tx: mpsc::Sender<SessionEvent>,
}

impl ThumbnailPipeline {
    /// Start the decode worker pool.
    pub fn new(
        config: &SessionConfig,
        generations: GenerationCounter,
        tx: mpsc::Sender<SessionEvent>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.decode_threads)
            .thread_name(|i| format!("batchrename-thumb-{i}"))
            .build()?;

        Ok(Self {
            pool: Arc::new(pool),
            bounds: config.thumbnail_bounds(),
            generations,
            tx,
        })
    }

    /// Queue a decode for `entry` on behalf of `generation`.
    ///
    /// Jobs whose generation is no longer current when they start are
    /// dropped without touching the file.
    pub fn submit(&self, generation: Generation, entry: &FileEntry) {
        let entry_id = entry.id;
        let path = entry.source_path.clone();
        let bounds = self.bounds;
        let generations = self.generations.clone();
        let tx = self.tx.clone();

        self.pool.spawn(move || {
            if !generations.is_current(generation) {
                debug!(%generation, %entry_id, "dropping stale thumbnail job");
                return;
            }

            let outcome = decode_guarded(&path, || decode_thumbnail(&path, bounds));
            if let Err(err) = &outcome {
                debug!(%entry_id, %err, "no preview");
            }

            let _ = tx.blocking_send(SessionEvent::Thumbnail {
                generation,
                result: ThumbnailResult { entry_id, outcome },
            });
        });
    }
}

impl std::fmt::Debug for ThumbnailPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailPipeline")
            .field("threads", &self.pool.current_num_threads())
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Run `decode`, turning a decoder panic into a [`DecodeError`] so the entry
/// still gets its one result.
fn decode_guarded<F>(path: &Path, decode: F) -> Result<Thumbnail, DecodeError>
where
    F: FnOnce() -> Result<Thumbnail, DecodeError>,
{
    panic::catch_unwind(AssertUnwindSafe(decode)).unwrap_or_else(|_| {
        warn!(path = %path.display(), "decoder panicked");
        Err(DecodeError::new(path, "decoder panicked"))
    })
}

/// Decode the image at `path` and fit it inside `max_width` x `max_height`.
///
/// The format is sniffed from the content, aspect ratio is preserved and
/// images already inside the box are not enlarged.
pub fn decode_thumbnail(
    path: &Path,
    (max_width, max_height): (u32, u32),
) -> Result<Thumbnail, DecodeError> {
    let image = ImageReader::open(path)
        .map_err(|e| DecodeError::new(path, e.to_string()))?
        .with_guessed_format()
        .map_err(|e| DecodeError::new(path, e.to_string()))?
        .decode()
        .map_err(|e| DecodeError::new(path, e.to_string()))?;

    let image = if image.width() > max_width || image.height() > max_height {
        image.thumbnail(max_width, max_height)
    } else {
        image
    };

    let rgba = image.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
