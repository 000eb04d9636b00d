//! Decision engine contract.
//!
//! The branching-decision engine is an external collaborator: this module
//! defines only the surface it is driven through. The engine receives
//! playback updates in segment-local time and issues transport commands
//! back through the [`PlayerDelegate`](crate::delegate::PlayerDelegate).

use crate::delegate::PlayerDelegate;
use crate::error::Result;
use async_trait::async_trait;
use interstitch_common::{EntryId, ProjectId};
use std::sync::Arc;

/// Reference to the media an engine `load` command targets.
///
/// The engine addresses media by the entry identifier carried in its
/// project graph; the delegate maps it onto the segment map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub entry: EntryId,
}

impl MediaRef {
    pub fn new(entry: EntryId) -> Self {
        Self { entry }
    }
}

/// Playback state pushed to the engine on every usable clock sample.
///
/// Times are segment-local seconds; the engine never sees the global clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackUpdate {
    /// Local time in seconds, millisecond precision, clamped to `duration`.
    pub current_time: f64,
    /// Segment duration in seconds.
    pub duration: f64,
    /// Whether the transport is paused.
    pub paused: bool,
    /// Whether the segment has effectively ended.
    pub ended: bool,
    /// Active segment video width in pixels.
    pub video_width: u32,
    /// Active segment video height in pixels.
    pub video_height: u32,
}

/// Event kinds reported by the engine through `event()`.
///
/// The wire form is `"namespace:name"`; kinds without dedicated handling
/// are re-broadcast untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    /// The project graph started playback.
    ProjectStart,
    /// The project graph reached a terminal node.
    ProjectEnded,
    /// Any other engine event.
    Other(String),
}

impl EngineEventKind {
    /// Parse an engine event string.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "project:start" => Self::ProjectStart,
            "project:ended" => Self::ProjectEnded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EngineEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectStart => write!(f, "project:start"),
            Self::ProjectEnded => write!(f, "project:ended"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// A loaded decision engine instance.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Load a project graph. Suspension point; the caller re-validates its
    /// session ticket when this resolves.
    async fn load_project(&self, project: &ProjectId) -> Result<()>;

    /// Push a playback state sample.
    fn update(&self, update: &PlaybackUpdate);

    /// Notify the engine of a viewport change.
    fn resize(&self, width: u32, height: u32);

    /// Restart the project from its entry node.
    fn replay(&self);
}

/// Fetches the engine bundle and constructs an engine bound to a delegate.
///
/// Suspension point; the result of a superseded load is discarded by the
/// caller, never cancelled in flight.
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load_engine(&self, delegate: Arc<PlayerDelegate>) -> Result<Arc<dyn DecisionEngine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_parse_round_trip() {
        assert_eq!(
            EngineEventKind::parse("project:start"),
            EngineEventKind::ProjectStart
        );
        assert_eq!(
            EngineEventKind::parse("project:ended"),
            EngineEventKind::ProjectEnded
        );
        assert_eq!(
            EngineEventKind::parse("node:enter"),
            EngineEventKind::Other("node:enter".to_string())
        );
        assert_eq!(EngineEventKind::parse("node:enter").to_string(), "node:enter");
    }
}
