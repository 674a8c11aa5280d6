//! Session configuration.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for one session controller.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SessionConfig {
    /// Width of the thumbnail bounding box in pixels.
    #[builder(default = "70")]
    #[serde(default = "default_thumbnail_side")]
    pub thumbnail_width: u32,

    /// Height of the thumbnail bounding box in pixels.
    #[builder(default = "70")]
    #[serde(default = "default_thumbnail_side")]
    pub thumbnail_height: u32,

    /// Capacity of the worker → owner handoff queue.
    #[builder(default = "100")]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// How often the owner context is expected to drain the queue.
    #[builder(default = "Duration::from_millis(100)")]
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Number of decode threads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub decode_threads: usize,

    /// Decode thumbnails for discovered entries.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub generate_thumbnails: bool,
}

fn default_thumbnail_side() -> u32 {
    70
}

fn default_channel_capacity() -> usize {
    100
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_true() -> bool {
    true
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.thumbnail_width == Some(0) || self.thumbnail_height == Some(0) {
            return Err("Thumbnail size must be non-zero".to_string());
        }
        if self.channel_capacity == Some(0) {
            return Err("Channel capacity must be non-zero".to_string());
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Thumbnail bounding box as `(width, height)`.
    pub fn thumbnail_bounds(&self) -> (u32, u32) {
        (self.thumbnail_width, self.thumbnail_height)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: default_thumbnail_side(),
            thumbnail_height: default_thumbnail_side(),
            channel_capacity: default_channel_capacity(),
            poll_interval: default_poll_interval(),
            decode_threads: 0,
            generate_thumbnails: true,
        }
    }
}
