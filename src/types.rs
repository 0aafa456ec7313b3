//! Core types for the map editing core.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: GeoJSON-style positions, geometries and features, layers, the
//! orthogonal mode enums, cursor tokens and axis-aligned rectangles.

use crate::constants::DEFAULT_LAYER_COLOR;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::trace;

// ============================================================================
// Coordinates & Geometry
// ============================================================================

/// A `[longitude, latitude]` pair in degrees.
///
/// Deserializes from any array of two or more numbers; an altitude or other
/// trailing ordinates are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position(pub f64, pub f64);

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ordinates = Vec::<f64>::deserialize(deserializer)?;
        match ordinates.as_slice() {
            [lon, lat, ..] => Ok(Self(*lon, *lat)),
            _ => Err(serde::de::Error::invalid_length(ordinates.len(), &"at least 2 ordinates")),
        }
    }
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(lon, lat)
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.1
    }
}

impl From<[f64; 2]> for Position {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self(lon, lat)
    }
}

/// A GeoJSON geometry, serialized as `{"type": ..., "coordinates": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Rings; the first ring is the exterior, the rest are holes
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Exterior ring of a Polygon, `None` for every other geometry type
    pub fn exterior_ring(&self) -> Option<&[Position]> {
        match self {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, Geometry::Polygon(_))
    }

    /// Name of the geometry type as it appears in GeoJSON
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

/// One geometric record with properties.
///
/// Geometry is optional: features with a missing or unparseable geometry
/// are kept in their layer but never match a spatial test.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "deserialize_lenient_geometry")]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            properties: serde_json::Map::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Property value rendered as a label string
    pub fn label(&self, field: &str) -> Option<String> {
        self.properties.get(field).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Unknown geometry types (e.g. `GeometryCollection`) and malformed
/// coordinates become `None` instead of failing the whole feature.
fn deserialize_lenient_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match Geometry::deserialize(value) {
        Ok(geometry) => Ok(Some(geometry)),
        Err(e) => {
            trace!(error = %e, "Keeping feature without its unreadable geometry");
            Ok(None)
        }
    }
}

/// An ordered list of features.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(feature: Feature) -> Self {
        Self {
            features: vec![feature],
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Unique layer identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Generate a fresh random id
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One vector dataset shown on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub features: FeatureCollection,
    /// RGBA fill color
    pub color: [u8; 4],
    /// Property used for feature labels
    pub label_field: Option<String>,
    pub visible: bool,
}

impl Layer {
    /// Create a layer with a generated id
    pub fn new(name: impl Into<String>, features: FeatureCollection) -> Self {
        Self::with_id(LayerId::new_v4(), name, features)
    }

    pub fn with_id(id: impl Into<LayerId>, name: impl Into<String>, features: FeatureCollection) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            features,
            color: DEFAULT_LAYER_COLOR,
            label_field: None,
            visible: true,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

// ============================================================================
// Modes
// ============================================================================

/// Structural editing operation gating vertex/feature mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditMode {
    #[default]
    View,
    Select,
    Modify,
    Transform,
    Scale,
    Translate,
    Rotate,
    ExtrudeSelect,
    GeometryToolSelect,
}

impl EditMode {
    pub const ALL: [EditMode; 9] = [
        EditMode::View,
        EditMode::Select,
        EditMode::Modify,
        EditMode::Transform,
        EditMode::Scale,
        EditMode::Translate,
        EditMode::Rotate,
        EditMode::ExtrudeSelect,
        EditMode::GeometryToolSelect,
    ];

    pub fn is_view(self) -> bool {
        self == EditMode::View
    }

    /// Modes whose gesture moves or deforms whole features
    pub fn is_transform_family(self) -> bool {
        matches!(
            self,
            EditMode::Transform | EditMode::Scale | EditMode::Translate | EditMode::Rotate
        )
    }
}

/// Non-structural interaction mode, active only when the edit mode is view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BasicTool {
    #[default]
    View,
    Select,
    SelectByArea,
    Move,
}

impl BasicTool {
    pub const ALL: [BasicTool; 4] = [
        BasicTool::View,
        BasicTool::Select,
        BasicTool::SelectByArea,
        BasicTool::Move,
    ];
}

/// Multi-feature operation a geometry tool session collects features for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometryTool {
    Union,
    Difference,
    Intersection,
    Extrude,
}

/// Cursor token handed to the rendering engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Pointer,
    Grab,
    Move,
    Crosshair,
    Auto,
}

impl Cursor {
    pub fn as_str(self) -> &'static str {
        match self {
            Cursor::Pointer => "pointer",
            Cursor::Grab => "grab",
            Cursor::Move => "move",
            Cursor::Crosshair => "crosshair",
            Cursor::Auto => "auto",
        }
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned region in degrees (planar, not geodesic).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// `[minLng, minLat, maxLng, maxLat]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn from_array([west, south, east, north]: [f64; 4]) -> Self {
        Self::new(west, south, east, north)
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.lon() >= self.west
            && position.lon() <= self.east
            && position.lat() >= self.south
            && position.lat() <= self.north
    }

    pub fn center(&self) -> Position {
        Position::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Grow to include `position`
    pub fn extend(&mut self, position: Position) {
        self.west = self.west.min(position.lon());
        self.south = self.south.min(position.lat());
        self.east = self.east.max(position.lon());
        self.north = self.north.max(position.lat());
    }
}
