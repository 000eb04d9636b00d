//! Error types for the interactive layer.
//!
//! Every variant here is terminal for the session except `InvalidPlaylist`,
//! which falls back to native playback without a user-visible alert. A stale
//! asynchronous result is deliberately *not* an error: continuations compare
//! generation tickets and discard themselves silently.

use interstitch_common::ProjectId;
use thiserror::Error;

/// Result type for interactive-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for interactive-layer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The playlist was empty or malformed. Disables interactivity and
    /// falls back to native playback; never surfaced as an alert.
    #[error("invalid playlist: {0}")]
    InvalidPlaylist(#[from] interstitch_timeline::Error),

    /// The engine bundle could not be fetched. Fatal.
    #[error("failed to load engine bundle: {0}")]
    BundleLoad(String),

    /// Project data could not be fetched or parsed. Fatal.
    #[error("failed to load project {project}: {reason}")]
    ProjectLoad { project: ProjectId, reason: String },

    /// The engine reported a runtime failure through `error()`. Fatal.
    #[error("engine runtime error: {0}")]
    EngineRuntime(String),
}

impl Error {
    /// Create a bundle load error.
    pub fn bundle_load(msg: impl Into<String>) -> Self {
        Self::BundleLoad(msg.into())
    }

    /// Create a project load error.
    pub fn project_load(project: ProjectId, reason: impl Into<String>) -> Self {
        Self::ProjectLoad {
            project,
            reason: reason.into(),
        }
    }

    /// Create an engine runtime error.
    pub fn engine_runtime(msg: impl Into<String>) -> Self {
        Self::EngineRuntime(msg.into())
    }

    /// Whether this error must funnel into the fatal alert sink.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidPlaylist(_))
    }

    /// Title for the blocking alert shown to the user.
    pub fn alert_title(&self) -> &'static str {
        match self {
            Self::InvalidPlaylist(_) => "Invalid playlist",
            Self::BundleLoad(_) => "Error loading the decision engine",
            Self::ProjectLoad { .. } => "Error loading the interactive project",
            Self::EngineRuntime(_) => "Error in the decision engine",
        }
    }
}
