use interstitch_timeline::{BoundaryClassifier, TranslationConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InteractiveConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// URL the engine bundle is fetched from.
    #[serde(default = "default_bundle_url")]
    pub bundle_url: String,

    /// Marker that flags an entry's partner data as interactive.
    #[serde(default = "default_partner_marker")]
    pub partner_marker: String,

    /// What to do when the project graph reaches a terminal node.
    #[serde(default)]
    pub end_of_project: EndOfProjectPolicy,
}

/// End-of-project behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfProjectPolicy {
    /// Restart the project from its entry node.
    Replay,
    /// Pause and hold the final frame.
    #[default]
    Hold,
}

/// Clock-consistency tunables.
///
/// The defaults mirror jitter bounds observed on production hosts; they are
/// configuration, not invariants.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Rounding tolerance for fragment-boundary error, in milliseconds.
    #[serde(default = "default_epsilon_ms")]
    pub epsilon_ms: f64,

    /// Distance from a segment's nominal end at which it counts as ended,
    /// in milliseconds.
    #[serde(default = "default_end_guard_ms")]
    pub end_guard_ms: f64,

    /// The host's minimum honored seek granularity, in seconds.
    #[serde(default = "default_seek_threshold_secs")]
    pub seek_threshold_secs: f64,
}

impl TimingConfig {
    /// Translation tuning for the segment tracker.
    pub fn translation(&self) -> TranslationConfig {
        TranslationConfig {
            epsilon_ms: self.epsilon_ms,
            seek_threshold_secs: self.seek_threshold_secs,
        }
    }

    /// Boundary classifier for the segment tracker.
    pub fn boundary(&self) -> BoundaryClassifier {
        BoundaryClassifier::new(self.end_guard_ms)
    }
}

fn default_bundle_url() -> String {
    "https://cdn.example.com/engine/v1/engine.min.js".to_string()
}

fn default_partner_marker() -> String {
    "raptmedia".to_string()
}

fn default_epsilon_ms() -> f64 {
    10.0
}

fn default_end_guard_ms() -> f64 {
    300.0
}

fn default_seek_threshold_secs() -> f64 {
    0.1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bundle_url: default_bundle_url(),
            partner_marker: default_partner_marker(),
            end_of_project: EndOfProjectPolicy::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            epsilon_ms: default_epsilon_ms(),
            end_guard_ms: default_end_guard_ms(),
            seek_threshold_secs: default_seek_threshold_secs(),
        }
    }
}
