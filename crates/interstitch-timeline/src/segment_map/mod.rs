//! Segment map for stitched playlists.
//!
//! A segment map precomputes the global time range each playlist asset
//! occupies in the stitched timeline. It is built once per playlist load,
//! replaced wholesale on the next load, and never mutated in place.

mod builder;

pub use builder::SegmentMapBuilder;

use interstitch_common::EntryId;
use std::collections::HashMap;

/// One stitched asset's time range within the global playback clock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Asset identifier this segment was built from.
    pub entry: EntryId,
    /// Discontinuity index (0-based playlist order).
    pub order: u32,
    /// Start time in the global clock, in milliseconds.
    pub start_ms: u64,
    /// Duration in milliseconds. Always > 0.
    pub duration_ms: u64,
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
}

impl Segment {
    /// Exclusive end of the segment in the global clock, in milliseconds.
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Whether a global time sample falls inside this segment.
    pub fn contains_ms(&self, global_ms: f64) -> bool {
        global_ms >= self.start_ms as f64 && global_ms < self.end_ms() as f64
    }
}

/// Input descriptor for one playlist asset, in playlist order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetDescriptor {
    /// Asset identifier.
    pub id: EntryId,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
}

/// Contiguous, non-overlapping timeline of segments for one playlist.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentMap {
    segments: Vec<Segment>,
    by_entry: HashMap<EntryId, usize>,
}

impl SegmentMap {
    /// Create a new segment map builder.
    pub fn builder() -> SegmentMapBuilder {
        SegmentMapBuilder::new()
    }

    /// Build a segment map directly from an ordered asset list.
    pub fn from_assets(assets: &[AssetDescriptor]) -> crate::Result<Self> {
        SegmentMapBuilder::new().assets(assets).build()
    }

    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        let mut by_entry = HashMap::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            // First occurrence wins if an entry repeats in the playlist.
            by_entry.entry(segment.entry.clone()).or_insert(i);
        }
        Self { segments, by_entry }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the map holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments in playlist order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get a segment by discontinuity order.
    pub fn get(&self, order: u32) -> Option<&Segment> {
        self.segments.get(order as usize)
    }

    /// Find the segment built from the given asset.
    pub fn for_entry(&self, entry: &EntryId) -> Option<&Segment> {
        self.by_entry.get(entry).map(|&i| &self.segments[i])
    }

    /// Find the segment containing the given global time in milliseconds.
    pub fn at_time_ms(&self, global_ms: f64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains_ms(global_ms))
    }

    /// Total stitched duration in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.segments.last().map(Segment::end_ms).unwrap_or(0)
    }

    /// Whether the given asset is part of this playlist.
    pub fn contains_entry(&self, entry: &EntryId) -> bool {
        self.by_entry.contains_key(entry)
    }
}
