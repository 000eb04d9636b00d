//! Active-segment tracking across clock samples.
//!
//! The active segment is sticky: it changes only on explicit activation
//! (media change completion, or project start), never because a time sample
//! happened to fall elsewhere. Corrections always measure against the
//! segment the engine chose, which is what makes undershoot and overshoot
//! detection meaningful.

use crate::boundary::BoundaryClassifier;
use crate::segment_map::Segment;
use crate::translate::{self, Correction, TranslationConfig};

/// Read-only query into an adaptive-streaming transport's fragment table.
///
/// Adaptive transports are permitted to shift fragment boundaries at load
/// time; the tracker raises a segment's computed start to the observed
/// fragment start once per activation, never retroactively.
pub trait FragmentTiming {
    /// Observed global start (ms) of the fragment carrying the given
    /// discontinuity marker, if the transport knows it.
    fn observed_start_ms(&self, order: u32) -> Option<f64>;
}

#[derive(Debug, Clone)]
struct ActiveSegment {
    segment: Segment,
    /// Effective start, possibly raised above `segment.start_ms`.
    start_ms: f64,
    /// Latched once the boundary classifier fires for this activation.
    ended: bool,
}

/// One translated and classified clock sample.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Segment-local time in milliseconds, clamped to `[0, duration]`.
    pub local_ms: f64,
    /// Local time to report to the engine: seconds, millisecond precision,
    /// clamped to the segment duration.
    pub local_secs: f64,
    /// Segment duration in seconds.
    pub duration_secs: f64,
    /// Corrective seek target (global ms), if the sample was out of bounds.
    pub correction: Option<f64>,
    /// Whether the segment has effectively ended.
    pub ended: bool,
    /// True only for the first `ended` classification of this activation.
    pub just_ended: bool,
}

/// Tracks the active segment and folds translation and boundary
/// classification over incoming clock samples.
#[derive(Debug)]
pub struct SegmentTracker {
    translation: TranslationConfig,
    boundary: BoundaryClassifier,
    active: Option<ActiveSegment>,
}

impl SegmentTracker {
    /// Create a tracker with the given tuning.
    pub fn new(translation: TranslationConfig, boundary: BoundaryClassifier) -> Self {
        Self {
            translation,
            boundary,
            active: None,
        }
    }

    /// Make a segment current.
    ///
    /// Applies the fragment-timing start correction (once, here) and re-arms
    /// the ended latch. Activating the same segment again is a deliberate
    /// navigation and re-arms as well.
    pub fn activate(&mut self, segment: Segment, timing: Option<&dyn FragmentTiming>) {
        let mut start_ms = segment.start_ms as f64;

        if let Some(timing) = timing {
            if let Some(observed) = timing.observed_start_ms(segment.order) {
                if observed > start_ms {
                    tracing::debug!(
                        order = segment.order,
                        computed_ms = start_ms,
                        observed_ms = observed,
                        "Raising segment start to observed fragment start"
                    );
                    start_ms = observed;
                }
            }
        }

        self.active = Some(ActiveSegment {
            segment,
            start_ms,
            ended: false,
        });
    }

    /// Drop the active segment; subsequent samples return `None`.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The active segment, if any.
    pub fn active(&self) -> Option<&Segment> {
        self.active.as_ref().map(|a| &a.segment)
    }

    /// Effective (possibly raised) start of the active segment, global ms.
    pub fn active_start_ms(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.start_ms)
    }

    /// Translate and classify one global clock sample.
    ///
    /// Returns `None` when no segment is active. Out-of-bounds samples carry
    /// a corrective seek target and are not classified; classification only
    /// happens once the clock is inside the segment.
    pub fn sample(&mut self, global_ms: f64) -> Option<Sample> {
        let active = self.active.as_mut()?;
        let duration_ms = active.segment.duration_ms as f64;

        let translated =
            translate::translate(global_ms, active.start_ms, duration_ms, &self.translation);

        if let Correction::SeekTo { global_ms: target } = translated.correction {
            tracing::debug!(
                order = active.segment.order,
                sample_ms = global_ms,
                target_ms = target,
                "Correcting out-of-bounds time sample"
            );
            return Some(Sample {
                local_ms: translated.local_ms,
                local_secs: self.boundary.report_secs(translated.local_ms, duration_ms),
                duration_secs: active.segment.duration_secs(),
                correction: Some(target),
                ended: active.ended,
                just_ended: false,
            });
        }

        let ended_now = self.boundary.is_ended(translated.local_ms, duration_ms);
        let just_ended = ended_now && !active.ended;
        active.ended |= ended_now;

        let local_ms = if ended_now {
            duration_ms
        } else {
            translated.local_ms
        };

        Some(Sample {
            local_ms,
            local_secs: self.boundary.report_secs(local_ms, duration_ms),
            duration_secs: active.segment.duration_secs(),
            correction: None,
            ended: active.ended,
            just_ended,
        })
    }
}
