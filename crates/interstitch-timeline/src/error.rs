//! Error types for interstitch-timeline.

use interstitch_common::EntryId;
use thiserror::Error;

/// Result type for interstitch-timeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for interstitch-timeline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The playlist contained no assets.
    #[error("playlist is empty")]
    EmptyPlaylist,

    /// An asset carried a non-positive duration.
    #[error("asset {entry} has invalid duration: {duration_ms} ms")]
    InvalidDuration { entry: EntryId, duration_ms: u64 },
}

impl Error {
    /// Create an invalid duration error.
    pub fn invalid_duration(entry: EntryId, duration_ms: u64) -> Self {
        Self::InvalidDuration { entry, duration_ms }
    }
}
