//! The adapter the decision engine drives.
//!
//! [`PlayerDelegate`] is the engine's entire view of the player: five
//! operations plus the two inbound notification channels. It is a concrete
//! type, not a loosely-shaped record; the engine receives it at construction
//! and never touches the host directly.

use crate::controller::Shared;
use crate::engine::{EngineEventKind, MediaRef};
use crate::error::Error;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Concrete adapter bridging engine commands to player transport calls.
pub struct PlayerDelegate {
    shared: Arc<Shared>,
}

impl PlayerDelegate {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Switch playback to the media the engine chose.
    ///
    /// Resolves once the host has completed the switch to this entry. Loads
    /// received while another is outstanding queue FIFO, each resolving on
    /// its own completion notification, so command order is preserved. A
    /// load issued before the project has started is deferred and resolves
    /// immediately; the change is issued at `project:start`.
    ///
    /// A target absent from the segment map is a benign no-op.
    pub async fn load(&self, media: MediaRef) {
        if let Some(done) = self.queue_load(media) {
            // The sender is dropped on disable; either way the load is over.
            let _ = done.await;
        }
    }

    fn queue_load(&self, media: MediaRef) -> Option<oneshot::Receiver<()>> {
        let shared = &self.shared;

        if !shared.session.read().is_active() {
            tracing::warn!(entry = %media.entry, "Engine load received while layer inactive");
            return None;
        }

        let known = shared
            .map
            .read()
            .as_ref()
            .is_some_and(|map| map.contains_entry(&media.entry));
        if !known {
            tracing::warn!(entry = %media.entry, "Load target not in segment map; ignoring");
            return None;
        }

        {
            let mut session = shared.session.write();
            if !session.project_started {
                tracing::debug!(entry = %media.entry, "Project not started; deferring media change");
                session.pending_target = Some(media.entry);
                return None;
            }
        }

        Some(shared.begin_change(media.entry))
    }

    /// Resume playback. Suppressed while a media change is outstanding.
    pub fn play(&self) {
        if !self.shared.load_queue.lock().is_empty() {
            tracing::debug!("Suppressing play during outstanding media change");
            return;
        }
        self.shared.host.request_play();
    }

    /// Pause playback. Suppressed while a media change is outstanding.
    pub fn pause(&self) {
        if !self.shared.load_queue.lock().is_empty() {
            tracing::debug!("Suppressing pause during outstanding media change");
            return;
        }
        self.shared.host.request_pause();
    }

    /// Seek within the active segment. The engine speaks segment-local
    /// seconds; the host receives global seconds.
    pub fn seek(&self, local_secs: f64) {
        let Some(start_ms) = self.shared.tracker.lock().active_start_ms() else {
            tracing::warn!("Engine seek with no active segment; ignoring");
            return;
        };
        self.shared
            .host
            .request_seek((start_ms + local_secs * 1000.0) / 1000.0);
    }

    /// Inbound engine event.
    pub fn event(&self, kind: EngineEventKind) {
        self.shared.handle_engine_event(kind);
    }

    /// Inbound engine error. Always fatal.
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(error = %message, "Engine reported a runtime error");
        self.shared.fatal(Error::engine_runtime(message));
    }
}
