//! Global-to-local time translation and seek-jitter correction.
//!
//! The host reports a single global clock across the whole stitched
//! playlist. The decision engine reasons in segment-local time. Translation
//! is a subtraction; the interesting part is detecting samples that landed
//! outside the active segment (seek undershoot on mobile, fragment drift
//! past the logical boundary) and nudging playback back inside it.
//!
//! Corrections are asymmetric on purpose: undershoot targets are rounded up
//! and overshoot targets rounded down, so a corrected seek always lands
//! strictly inside the segment and cannot oscillate between the correction
//! rules of two adjacent segments.

/// Tunable constants for translation and correction.
///
/// The defaults match the observed behavior of production hosts, but they are
/// configuration, not invariants.
#[derive(Debug, Clone, Copy)]
pub struct TranslationConfig {
    /// Rounding tolerance in milliseconds for fragment-boundary error.
    pub epsilon_ms: f64,
    /// The host's minimum honored seek granularity, in seconds.
    pub seek_threshold_secs: f64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            epsilon_ms: 10.0,
            seek_threshold_secs: 0.1,
        }
    }
}

impl TranslationConfig {
    /// Minimum correction distance in milliseconds.
    ///
    /// Slightly past the host's seek granularity, so a corrective seek is
    /// honored instead of being immediately re-corrected.
    pub fn min_seek_ms(&self) -> f64 {
        (self.seek_threshold_secs + 0.01) * 1000.0
    }
}

/// Corrective action for an out-of-bounds time sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// The sample is inside the segment; nothing to do.
    None,
    /// Seek the host to this global time in milliseconds.
    SeekTo { global_ms: f64 },
}

/// Result of translating one global clock sample.
#[derive(Debug, Clone, Copy)]
pub struct Translation {
    /// Segment-local time in milliseconds, clamped to `[0, duration]`.
    pub local_ms: f64,
    /// Correction to issue, if the sample fell outside the segment.
    pub correction: Correction,
}

/// Translate a global clock sample against a segment's time range.
///
/// `start_ms` is the segment's effective start (possibly raised by a
/// fragment-timing correction); `duration_ms` its duration.
pub fn translate(
    global_ms: f64,
    start_ms: f64,
    duration_ms: f64,
    config: &TranslationConfig,
) -> Translation {
    let local_ms = global_ms - start_ms;

    if local_ms < -config.epsilon_ms {
        // Seek undershoot: the host landed before the segment start. Nudge
        // forward just past the minimum honored granularity.
        let target = (start_ms + (local_ms + config.min_seek_ms()).max(0.0)).ceil();
        return Translation {
            local_ms: 0.0,
            correction: Correction::SeekTo { global_ms: target },
        };
    }

    if local_ms > duration_ms {
        // Overshoot: playback drifted past the logical boundary.
        let target = (start_ms
            + (local_ms - config.min_seek_ms()).min(duration_ms - config.epsilon_ms))
        .floor();
        return Translation {
            local_ms: duration_ms,
            correction: Correction::SeekTo { global_ms: target },
        };
    }

    Translation {
        local_ms: local_ms.max(0.0),
        correction: Correction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: f64 = 5000.0;
    const DURATION: f64 = 4000.0;

    fn run(global_ms: f64) -> Translation {
        translate(global_ms, START, DURATION, &TranslationConfig::default())
    }

    #[test]
    fn test_in_bounds_is_idempotent() {
        for global in [5000.0, 5001.0, 7250.5, 8999.0] {
            let t = run(global);
            assert_eq!(t.correction, Correction::None);
            assert_eq!(t.local_ms, global - START);
        }
    }

    #[test]
    fn test_small_negative_jitter_is_clamped_not_corrected() {
        // Within epsilon: tolerated as rounding error, reported as zero.
        let t = run(4995.0);
        assert_eq!(t.correction, Correction::None);
        assert_eq!(t.local_ms, 0.0);
    }

    #[test]
    fn test_undershoot_correction() {
        // local = -15, below -epsilon; min_seek = 110.
        let t = run(4985.0);
        assert_eq!(
            t.correction,
            Correction::SeekTo { global_ms: 5095.0 }
        );
        assert_eq!(t.local_ms, 0.0);
    }

    #[test]
    fn test_deep_undershoot_targets_segment_start() {
        // local = -500; local + min_seek is still negative, so the max(0)
        // clamp pins the target to the segment start.
        let t = run(4500.0);
        assert_eq!(
            t.correction,
            Correction::SeekTo { global_ms: 5000.0 }
        );
    }

    #[test]
    fn test_overshoot_correction() {
        // local = 4300 > duration; target = floor(5000 + min(3990, 4190)).
        let t = run(9300.0);
        assert_eq!(
            t.correction,
            Correction::SeekTo { global_ms: 8990.0 }
        );
        assert_eq!(t.local_ms, DURATION);
    }

    #[test]
    fn test_slight_overshoot_lands_inside_end_epsilon() {
        // local = 4050; local - min_seek = 3940 < duration - epsilon = 3990.
        let t = run(9050.0);
        assert_eq!(
            t.correction,
            Correction::SeekTo { global_ms: 8940.0 }
        );
    }

    #[test]
    fn test_min_seek_ms_default() {
        let config = TranslationConfig::default();
        assert!((config.min_seek_ms() - 110.0).abs() < 1e-9);
    }
}
