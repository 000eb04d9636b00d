//! Host player contract.
//!
//! The host player owns the video element, the transport, and the native
//! GUI. The interactive layer drives it exclusively through [`HostPlayer`]
//! and is driven by it through [`HostEvent`]. All times crossing this
//! boundary are global-clock seconds; segment-local time never leaves the
//! interactive layer.

use interstitch_common::EntryId;
use interstitch_timeline::AssetDescriptor;
use serde::{Deserialize, Serialize};

/// Host GUI surface that can be gated while the engine decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuiScope {
    /// Transport controls (play/pause/scrubber).
    Transport,
    /// Interactive overlay controls.
    Interactive,
}

/// Host configuration captured at enable time and restored at disable.
///
/// These are the native end-of-clip behaviors that would fight the engine:
/// a stitched segment ending must not show a poster, an end screen, or a
/// replay button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Native end-of-playback interface enabled.
    pub on_done_interface: bool,
    /// Host ends the clip at the asset boundary.
    pub should_end_clip: bool,
    /// Poster shown when playback stops.
    pub show_poster_on_stop: bool,
    /// Poster hidden as soon as playback starts.
    pub hide_poster_on_start: bool,
    /// Poster kept visible until first playback.
    pub keep_poster: bool,
}

impl Default for HostSettings {
    /// Typical native-player defaults: end-of-clip behavior on, poster
    /// shown on stop.
    fn default() -> Self {
        Self {
            on_done_interface: true,
            should_end_clip: true,
            show_poster_on_stop: true,
            hide_poster_on_start: false,
            keep_poster: false,
        }
    }
}

impl HostSettings {
    /// The override set applied while the interactive layer is live:
    /// suppress every native end-of-clip behavior, keep the poster until
    /// the project actually starts.
    pub fn interactive_overrides(&self) -> Self {
        Self {
            on_done_interface: false,
            should_end_clip: false,
            show_poster_on_stop: false,
            hide_poster_on_start: self.hide_poster_on_start,
            keep_poster: true,
        }
    }
}

/// One sample of the host player's clock and transport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Global playlist time in seconds.
    pub global_time_secs: f64,
    /// Total stitched duration in seconds.
    pub duration_secs: f64,
    /// Whether the transport is playing.
    pub is_playing: bool,
    /// Whether a seek is in flight. Samples taken mid-seek are unreliable
    /// and are skipped.
    pub seeking: bool,
}

/// Notification from the host player into the interactive layer.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Periodic clock sample.
    Tick(TickInfo),
    /// A seek completed; the clock sample is post-seek.
    Seeked(TickInfo),
    /// Entry metadata is available for a (possibly interactive) entry.
    EntryDataReady {
        assets: Vec<AssetDescriptor>,
        partner_data: Option<String>,
    },
    /// A media change finished and the given entry is now active.
    ChangeMediaDone { entry: EntryId },
    /// The player layout changed size.
    LayoutChanged,
}

/// Transport and chrome operations the interactive layer may request.
pub trait HostPlayer: Send + Sync {
    /// Seek to a global time in seconds.
    fn request_seek(&self, global_secs: f64);

    /// Resume playback.
    fn request_play(&self);

    /// Pause playback.
    fn request_pause(&self);

    /// Switch the active media to another playlist entry.
    fn request_change_media(&self, entry: &EntryId);

    /// Enable or gate a GUI surface.
    fn set_gui_enabled(&self, scope: GuiScope, enabled: bool);

    /// Show or hide the interactive overlay surface.
    fn set_overlay_visible(&self, visible: bool);

    /// Mark the player chrome as running an interactive project.
    fn set_interactive_running(&self, running: bool);

    /// Remove the poster immediately.
    fn hide_poster(&self);

    /// Snapshot the host configuration the layer will override.
    fn settings(&self) -> HostSettings;

    /// Apply a configuration snapshot.
    fn apply_settings(&self, settings: &HostSettings);

    /// Current video viewport in pixels.
    fn viewport(&self) -> (u32, u32);
}
