//! Layer store - the ordered set of map layers and their spatial indexes.
//!
//! After import, geometry only changes through [`LayerStore::replace_features`],
//! which the edit-commit handlers call. Each replacement rebuilds the layer's
//! R-tree so area selection always queries current geometry.

use crate::error::{EditorError, EditorResult};
use crate::geometry::feature_within_bounds;
use crate::spatial_index::SpatialIndex;
use crate::types::{BoundingBox, FeatureCollection, Layer, LayerId};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
    indexes: HashMap<LayerId, SpatialIndex>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from layers, keeping the first of any duplicated ids.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let mut store = Self::new();
        store.set_layers(layers);
        store
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Replace every layer at once.
    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        self.layers.clear();
        self.indexes.clear();
        for layer in layers {
            if self.contains(&layer.id) {
                debug!(layer = %layer.id, "Skipping duplicate layer id");
                continue;
            }
            self.indexes
                .insert(layer.id.clone(), SpatialIndex::from_features(&layer.features));
            self.layers.push(layer);
        }
    }

    /// Append a layer; ids must be unique.
    pub fn add_layer(&mut self, layer: Layer) -> EditorResult<()> {
        if self.contains(&layer.id) {
            return Err(EditorError::DuplicateLayer(layer.id));
        }
        self.indexes
            .insert(layer.id.clone(), SpatialIndex::from_features(&layer.features));
        self.layers.push(layer);
        Ok(())
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> EditorResult<Layer> {
        let position = self
            .layers
            .iter()
            .position(|layer| &layer.id == id)
            .ok_or_else(|| EditorError::UnknownLayer(id.clone()))?;
        self.indexes.remove(id);
        Ok(self.layers.remove(position))
    }

    /// Swap in new geometry for a layer. Returns false (and changes nothing)
    /// when the layer no longer exists.
    pub fn replace_features(&mut self, id: &LayerId, features: FeatureCollection) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|layer| &layer.id == id) else {
            return false;
        };
        self.indexes
            .insert(id.clone(), SpatialIndex::from_features(&features));
        layer.features = features;
        true
    }

    pub fn set_visible(&mut self, id: &LayerId, visible: bool) -> EditorResult<()> {
        let layer = self
            .layers
            .iter_mut()
            .find(|layer| &layer.id == id)
            .ok_or_else(|| EditorError::UnknownLayer(id.clone()))?;
        layer.visible = visible;
        Ok(())
    }

    pub fn spatial_index(&self, id: &LayerId) -> Option<&SpatialIndex> {
        self.indexes.get(id)
    }

    /// Ascending indexes of the layer's features touching `bounds`.
    ///
    /// The R-tree narrows candidates by bounding box; the coarse containment
    /// rule then decides. Any feature passing the rule has a coordinate inside
    /// the region, so its envelope always intersects it.
    pub fn features_in_bounds(&self, id: &LayerId, bounds: &BoundingBox) -> Vec<usize> {
        let (Some(layer), Some(index)) = (self.get(id), self.indexes.get(id)) else {
            return Vec::new();
        };
        index
            .query_rect(bounds)
            .into_iter()
            .filter(|&i| {
                layer
                    .features
                    .get(i)
                    .is_some_and(|feature| feature_within_bounds(feature, bounds))
            })
            .collect()
    }
}
