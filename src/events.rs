//! Outbound notifications from the interactive layer.
//!
//! Everything user- or host-visible flows through one broadcast channel.
//! Subscribers get an explicit receiver handle; there is no ambient event
//! bus to bind against, and dropping the handle is the unsubscribe.

use interstitch_common::{EntryId, ProjectId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel; laggy subscribers lose oldest events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notification emitted by the interactive layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// The interactive layer finished loading and is live.
    InteractiveReady { project: ProjectId },

    /// The interactive layer was torn down and host state restored.
    InteractiveCleanup { project: ProjectId },

    /// A new segment became current.
    SegmentActivated { entry: EntryId, order: u32 },

    /// Playback reached a segment's effective end; transport is paused
    /// until the engine issues its next command.
    DecisionPointReached { entry: EntryId, local_secs: f64 },

    /// An engine event, re-broadcast for host-side listeners.
    EngineEvent { kind: String },

    /// A fatal failure. The host should show a single blocking alert and
    /// must not auto-retry.
    FatalAlert { title: String, message: String },
}

/// Broadcast sender with a fixed capacity, shared by the controller.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to all subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event. Dropped silently when nobody is listening.
    pub fn emit(&self, event: PlayerEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::trace!("No event subscribers: {}", err);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_receives_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(PlayerEvent::InteractiveReady {
            project: ProjectId::from("p1"),
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, PlayerEvent::InteractiveReady { project } if project.as_str() == "p1"));
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(PlayerEvent::EngineEvent {
            kind: "project:start".to_string(),
        });
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = PlayerEvent::DecisionPointReached {
            entry: EntryId::from("e1"),
            local_secs: 3.75,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"decision_point_reached\""));
    }
}
