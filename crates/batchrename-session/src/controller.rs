//! The owner context.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use batchrename_core::{EntryId, Generation, GenerationCounter, SessionConfig};
use batchrename_ops::{RenameDecision, RenameReport};
use batchrename_scan::{SessionEvent, ThumbnailPipeline, event_channel, spawn_scan};

use crate::error::SessionError;
use crate::session::Session;
use crate::update::{SessionUpdate, ValidationEvent};

/// Owns the current session and the receiving end of the worker queue.
///
/// All session mutation happens through `&mut self`, on the thread that
/// drives the controller. Workers only ever send events.
pub struct SessionController {
    config: SessionConfig,
    generations: GenerationCounter,
    tx: mpsc::Sender<SessionEvent>,
    rx: mpsc::Receiver<SessionEvent>,
    pipeline: Option<ThumbnailPipeline>,
    session: Option<Session>,
}

impl SessionController {
    /// Create a controller and start its thumbnail workers.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let generations = GenerationCounter::new();
        let (tx, rx) = event_channel(config.channel_capacity);

        let pipeline = if config.generate_thumbnails {
            Some(ThumbnailPipeline::new(
                &config,
                generations.clone(),
                tx.clone(),
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            generations,
            tx,
            rx,
            pipeline,
            session: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// How long drivers should wait between calls to [`poll`](Self::poll).
    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    /// The current session, if a folder has been loaded.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start loading `folder`, replacing the current session.
    ///
    /// Work still running for the previous folder becomes stale: its results
    /// are discarded by [`poll`](Self::poll) and its workers stop early.
    pub fn load_folder(&mut self, folder: impl Into<PathBuf>) -> Result<Generation, SessionError> {
        let folder = folder.into();
        let generation = self.generations.advance();
        self.session = Some(Session::new(generation, folder.clone()));

        info!(%generation, folder = %folder.display(), "loading folder");

        spawn_scan(
            folder.clone(),
            generation,
            self.generations.clone(),
            self.tx.clone(),
            self.pipeline.clone(),
        )
        .map_err(|source| SessionError::ScanThread {
            path: folder,
            source,
        })?;

        Ok(generation)
    }

    /// Drain queued worker events without blocking.
    ///
    /// At most `channel_capacity` events are applied per call; anything left
    /// waits for the next poll. Events from older folder loads are dropped.
    /// The returned updates are in the order the events were applied.
    pub fn poll(&mut self) -> Vec<SessionUpdate> {
        self.drain(self.config.channel_capacity)
    }

    fn drain(&mut self, budget: usize) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();

        for _ in 0..budget {
            let Ok(event) = self.rx.try_recv() else {
                break;
            };
            let Some(session) = self.session.as_mut() else {
                continue;
            };

            if event.generation() != session.generation() {
                debug!(
                    stale = %event.generation(),
                    current = %session.generation(),
                    "discarding stale event"
                );
                session.progress_mut().record_stale();
                continue;
            }

            match event {
                SessionEvent::Discovered { entry, .. } => {
                    updates.push(SessionUpdate::EntryDiscovered {
                        id: entry.id,
                        current_name: entry.current_name.to_string(),
                    });
                    session.push_entry(entry);
                }
                SessionEvent::Thumbnail { result, .. } => {
                    let entry_id = result.entry_id;
                    if let Some(thumbnail) = session.set_thumbnail(result) {
                        updates.push(SessionUpdate::ThumbnailReady {
                            entry_id,
                            thumbnail,
                        });
                    }
                }
                SessionEvent::ScanFinished { discovered, .. } => {
                    session.finish_scan(None);
                    updates.push(SessionUpdate::ScanFinished { discovered });
                }
                SessionEvent::ScanFailed {
                    discovered, error, ..
                } => {
                    session.finish_scan(Some(error.to_string()));
                    if session.entries().is_empty() {
                        updates.push(SessionUpdate::FolderUnreadable { error });
                    } else {
                        updates.push(SessionUpdate::ScanIncomplete { discovered, error });
                    }
                }
            }
        }

        updates
    }

    /// Whether the current session expects no more worker events.
    pub fn is_settled(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.progress().is_settled(self.pipeline.is_some()))
    }

    /// Set the candidate for one row; see [`Session::set_candidate`].
    pub fn set_candidate(&mut self, id: EntryId, text: &str) -> Option<ValidationEvent> {
        self.session.as_mut()?.set_candidate(id, text)
    }

    /// Paste one candidate per line; see [`Session::paste_names`].
    pub fn paste_names(&mut self, text: &str) -> Vec<ValidationEvent> {
        self.session
            .as_mut()
            .map(|s| s.paste_names(text))
            .unwrap_or_default()
    }

    /// Empty every candidate of the current session.
    pub fn clear_candidates(&mut self) -> Vec<ValidationEvent> {
        self.session
            .as_mut()
            .map(Session::clear_candidates)
            .unwrap_or_default()
    }

    /// Plan without renaming, for the entries present right now.
    pub fn preview_plan(&self) -> Option<Vec<RenameDecision>> {
        self.session.as_ref().map(Session::plan)
    }

    /// Run one rename batch over the entries present right now.
    pub fn rename_all(&mut self) -> Option<RenameReport> {
        self.session.as_mut().map(Session::rename_all)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("generation", &self.generations.current())
            .field("pipeline", &self.pipeline)
            .field("session", &self.session.as_ref().map(Session::folder))
            .finish()
    }
}
