//! Candidate name validation.

use thiserror::Error;

/// Characters that may not appear in a target name.
pub const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// A candidate name contains a reserved character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Name cannot contain '{0}'")]
pub struct InvalidChar(pub char);

/// Validate a candidate base name.
///
/// Only the reserved character set is checked. An empty name means "no
/// candidate" to callers and is never reported here.
pub fn validate_name(name: &str) -> Result<(), InvalidChar> {
    match name.chars().find(|c| RESERVED_CHARS.contains(c)) {
        Some(c) => Err(InvalidChar(c)),
        None => Ok(()),
    }
}
