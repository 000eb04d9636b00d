//! Segment map builder.

use super::{AssetDescriptor, Segment, SegmentMap};
use crate::error::Error;

/// Builder for creating segment maps from ordered asset lists.
#[derive(Debug, Default)]
pub struct SegmentMapBuilder {
    assets: Vec<AssetDescriptor>,
}

impl SegmentMapBuilder {
    /// Create a new builder with no assets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single asset in playlist order.
    pub fn asset(mut self, asset: AssetDescriptor) -> Self {
        self.assets.push(asset);
        self
    }

    /// Append a slice of assets in playlist order.
    pub fn assets(mut self, assets: &[AssetDescriptor]) -> Self {
        self.assets.extend_from_slice(assets);
        self
    }

    /// Build the segment map.
    ///
    /// Runs a linear scan accumulating each segment's start as the running
    /// sum of prior durations, assigning the scan index as the discontinuity
    /// order. Fails if the list is empty or any duration is zero; the caller
    /// must not enable the interactive layer with an empty map.
    pub fn build(self) -> crate::Result<SegmentMap> {
        if self.assets.is_empty() {
            return Err(Error::EmptyPlaylist);
        }

        let mut segments = Vec::with_capacity(self.assets.len());
        let mut start_ms: u64 = 0;

        for (order, asset) in self.assets.into_iter().enumerate() {
            if asset.duration_ms == 0 {
                return Err(Error::invalid_duration(asset.id, asset.duration_ms));
            }

            segments.push(Segment {
                entry: asset.id,
                order: order as u32,
                start_ms,
                duration_ms: asset.duration_ms,
                width: asset.width,
                height: asset.height,
            });

            start_ms += segments[order].duration_ms;
        }

        Ok(SegmentMap::new(segments))
    }
}
