//! Interstitch-Timeline: segment maps and clock translation for stitched playlists
//!
//! This crate keeps the two clocks of a stitched playlist consistent: the
//! host player's global clock, which runs across every stitched asset, and
//! the segment-local clock the decision engine reasons in.
//!
//! # Modules
//!
//! - `segment_map` - Contiguous, non-overlapping timeline built from the playlist
//! - `translate` - Global-to-local translation and seek-jitter correction
//! - `boundary` - End-of-segment (decision point) classification
//! - `tracker` - Sticky active-segment state, fragment-start correction, ended latch
//!
//! # Architecture
//!
//! The segment map is built once per playlist load and never mutated. During
//! playback, every host clock sample flows through a [`SegmentTracker`]:
//!
//! 1. The sample is translated against the active segment's start
//! 2. Out-of-bounds samples (seek undershoot/overshoot) yield a corrective seek
//! 3. In-bounds samples are classified against the end guard
//! 4. The first `ended` classification per segment activation latches, so the
//!    decision-point signal fires exactly once

pub mod boundary;
pub mod error;
pub mod segment_map;
pub mod tracker;
pub mod translate;

pub use boundary::BoundaryClassifier;
pub use error::{Error, Result};
pub use segment_map::{AssetDescriptor, Segment, SegmentMap, SegmentMapBuilder};
pub use tracker::{FragmentTiming, Sample, SegmentTracker};
pub use translate::{Correction, Translation, TranslationConfig};
