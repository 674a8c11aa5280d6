//! File entry and session generation types.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// File extensions eligible for a session, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Ordinal identifier of an entry within one session (1-based, scan order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Create a new EntryId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discovered image file and its current identity on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Stable identifier for the session.
    pub id: EntryId,
    /// Full path of the file as it currently exists.
    pub source_path: PathBuf,
    /// File name (with extension) as it currently exists.
    pub current_name: CompactString,
    /// Original extension including the leading dot, or empty.
    pub extension: CompactString,
}

impl FileEntry {
    /// Create an entry for `name` inside `folder`.
    pub fn new(id: EntryId, folder: &Path, name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| CompactString::new(format!(".{e}")))
            .unwrap_or_default();

        Self {
            id,
            source_path: folder.join(name),
            current_name: CompactString::new(name),
            extension,
        }
    }

    /// The folder this entry lives in.
    pub fn folder(&self) -> &Path {
        self.source_path.parent().unwrap_or(Path::new(""))
    }

    /// Full file name for a new base name, keeping the original extension.
    pub fn full_name_for(&self, base_name: &str) -> String {
        format!("{base_name}{}", self.extension)
    }

    /// Record that the file now lives under `new_name` in the same folder.
    pub fn set_name(&mut self, new_name: &str) {
        self.source_path = self.folder().join(new_name);
        self.current_name = CompactString::new(new_name);
    }

    /// Check whether a file name ends in one of the eligible image extensions.
    ///
    /// A bare `.png` counts too, even though it has no stem.
    pub fn is_image_name(name: &str) -> bool {
        name.rsplit_once('.').is_some_and(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
    }
}

/// Tag identifying one folder load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonically increasing generation counter shared with worker threads.
///
/// The owner context advances it when a new folder is loaded; workers read it
/// to find out whether the work they were started for is still wanted.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Create a counter at generation zero (no session loaded yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return it.
    pub fn advance(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The generation of the most recent folder load.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Check whether `generation` is still the live one.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_extension_keeps_case() {
        let entry = FileEntry::new(EntryId::new(1), Path::new("/photos"), "Holiday.JPG");
        assert_eq!(entry.extension, ".JPG");
        assert_eq!(entry.source_path, PathBuf::from("/photos/Holiday.JPG"));
        assert_eq!(entry.full_name_for("beach"), "beach.JPG");
    }

    #[test]
    fn test_entry_set_name() {
        let mut entry = FileEntry::new(EntryId::new(3), Path::new("/photos"), "a.png");
        entry.set_name("b.png");
        assert_eq!(entry.current_name, "b.png");
        assert_eq!(entry.source_path, PathBuf::from("/photos/b.png"));
        assert_eq!(entry.id, EntryId::new(3));
    }

    #[test]
    fn test_is_image_name() {
        assert!(FileEntry::is_image_name("a.png"));
        assert!(FileEntry::is_image_name("a.WebP"));
        assert!(FileEntry::is_image_name("scan.jpeg"));
        assert!(!FileEntry::is_image_name("notes.txt"));
        assert!(!FileEntry::is_image_name("png"));
        assert!(!FileEntry::is_image_name("archive.png.zip"));
        assert!(FileEntry::is_image_name(".png"));
        assert!(FileEntry::is_image_name(".JPG"));
    }

    #[test]
    fn test_dot_name_has_no_extension() {
        let entry = FileEntry::new(EntryId::new(1), Path::new("/photos"), ".png");
        assert_eq!(entry.extension, "");
        assert_eq!(entry.full_name_for("cover"), "cover");
    }

    #[test]
    fn test_generation_counter() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current(), Generation(0));

        let first = counter.advance();
        let shared = counter.clone();
        assert!(shared.is_current(first));

        let second = counter.advance();
        assert!(second > first);
        assert!(!shared.is_current(first));
        assert!(shared.is_current(second));
    }
}
