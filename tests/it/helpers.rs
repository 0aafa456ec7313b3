//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestLayerBuilder` - Builder pattern for creating test layers
//! - Geometry shorthands like `point()`, `polygon()`, `rectangle()`
//! - `session_with()` for a session over prebuilt layers

#![allow(dead_code)]

use geoedit::geometry::rectangle_polygon;
use geoedit::{
    BoundingBox, EditEvent, EditType, EditorSettings, Feature, FeatureCollection, Geometry, Layer, Position, Session,
};

// ============================================================================
// TestLayerBuilder - Builder pattern for creating test layers
// ============================================================================

/// Builder for creating test layers with features.
///
/// # Example
/// ```ignore
/// let layer = TestLayerBuilder::new("parcels")
///     .with_point(0.0, 0.0)
///     .with_square(1.0, 1.0, 0.5)
///     .build();
/// ```
pub struct TestLayerBuilder {
    id: String,
    features: Vec<Feature>,
    label_field: Option<String>,
}

impl TestLayerBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            features: Vec::new(),
            label_field: None,
        }
    }

    pub fn with_point(mut self, lon: f64, lat: f64) -> Self {
        self.features.push(point(lon, lat));
        self
    }

    /// Axis-aligned square polygon centered at `(lon, lat)`
    pub fn with_square(mut self, lon: f64, lat: f64, half: f64) -> Self {
        self.features
            .push(rectangle(lon - half, lat - half, lon + half, lat + half));
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_label_field(mut self, field: &str) -> Self {
        self.label_field = Some(field.to_string());
        self
    }

    pub fn build(self) -> Layer {
        let mut layer = Layer::with_id(self.id.as_str(), self.id.to_uppercase(), FeatureCollection::new(self.features));
        layer.label_field = self.label_field;
        layer
    }
}

// ============================================================================
// Geometry shorthands
// ============================================================================

pub fn pos(lon: f64, lat: f64) -> Position {
    Position::new(lon, lat)
}

pub fn point(lon: f64, lat: f64) -> Feature {
    Feature::new(Geometry::Point(pos(lon, lat)))
}

pub fn polygon(ring: &[[f64; 2]]) -> Feature {
    Feature::new(Geometry::Polygon(vec![ring.iter().copied().map(Position::from).collect()]))
}

pub fn rectangle(west: f64, south: f64, east: f64, north: f64) -> Feature {
    Feature::new(rectangle_polygon(&BoundingBox::new(west, south, east, north)))
}

/// The unit square used by the extrude scenarios
pub fn unit_square() -> Feature {
    polygon(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]])
}

// ============================================================================
// Sessions and events
// ============================================================================

pub fn session_with(layers: Vec<Layer>) -> Session {
    Session::with_layers(EditorSettings::default(), layers)
}

/// The `addFeature` edit a rectangle-drawing mode emits when the user
/// releases the pointer.
pub fn add_drawn_feature(feature: Feature) -> EditEvent {
    let mut event = EditEvent::new(EditType::AddFeature).with_data(FeatureCollection::single(feature));
    event.edit_context.feature_indexes = Some(vec![0]);
    event
}
