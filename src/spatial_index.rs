//! Spatial Index Module
//!
//! Provides R-tree based spatial indexing of feature bounding boxes for one
//! layer. Area selection uses it to narrow the features it has to run the
//! exact containment rule against, from O(n) to O(log n + k).

use crate::geometry::feature_bounds;
use crate::types::{BoundingBox, FeatureCollection};
use rstar::{AABB, RTree, RTreeObject};
use std::fmt;

/// A spatial entry representing one feature's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub feature_index: usize,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl SpatialEntry {
    pub fn new(feature_index: usize, bounds: &BoundingBox) -> Self {
        Self {
            feature_index,
            min_lon: bounds.west,
            min_lat: bounds.south,
            max_lon: bounds.east,
            max_lat: bounds.north,
        }
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.feature_index == other.feature_index
    }
}

/// Spatial index over the features of one layer, keyed by feature index.
///
/// Features without geometry (or without coordinates) are not indexed and
/// therefore never returned.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from every feature of a collection.
    pub fn from_features(features: &FeatureCollection) -> Self {
        Self {
            tree: RTree::bulk_load(Self::entries(features)),
        }
    }

    fn entries(features: &FeatureCollection) -> Vec<SpatialEntry> {
        features
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| feature_bounds(feature).map(|b| SpatialEntry::new(index, &b)))
            .collect()
    }

    /// Feature indexes whose bounding box intersects the region, ascending.
    pub fn query_rect(&self, bounds: &BoundingBox) -> Vec<usize> {
        let envelope = AABB::from_corners([bounds.west, bounds.south], [bounds.east, bounds.north]);

        let mut indexes: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.feature_index)
            .collect();
        indexes.sort_unstable();
        indexes
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn rebuild(&mut self, features: &FeatureCollection) {
        self.tree = RTree::bulk_load(Self::entries(features));
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.len()).finish()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
