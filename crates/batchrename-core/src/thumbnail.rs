//! Thumbnail preview types.

use crate::{DecodeError, EntryId};

/// Downsampled RGBA8 preview of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Thumbnail {
    /// Check that the pixel buffer matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}

/// Outcome of previewing one entry, produced once per entry.
#[derive(Debug, Clone)]
pub struct ThumbnailResult {
    pub entry_id: EntryId,
    pub outcome: Result<Thumbnail, DecodeError>,
}

impl ThumbnailResult {
    /// Collapse the outcome into the "preview or nothing" the rows show.
    pub fn into_preview(self) -> Option<Thumbnail> {
        self.outcome.ok()
    }
}
