//! Overlay layer synthesis.
//!
//! Overlays are derived only from state: the drawing rectangle, a finished
//! rectangle, the area-selection lasso, extrude vertex markers and geometry
//! tool highlights. [`OverlayInputs`] captures exactly the values synthesis
//! reads; [`OverlayCache`] recomputes only when those values change.
//!
//! An overlay whose conditions do not hold is `None`, never an empty layer.

use crate::constants::{
    DRAWN_BOUNDS_COLOR, HIGHLIGHT_COLOR, OVERLAY_DRAWING_BOUNDS, OVERLAY_DRAWN_BOUNDS, OVERLAY_EXTRUDE_POINTS,
    OVERLAY_GEOMETRY_TOOL_FEATURES, OVERLAY_SELECTION_RECTANGLE, SELECTION_RECTANGLE_COLOR,
};
use crate::geometry::rectangle_polygon;
use crate::layers::LayerStore;
use crate::profile_scope;
use crate::state::{DrawingModeKind, DrawingState, EditingState, SelectedFeature};
use crate::types::{BasicTool, BoundingBox, Feature, FeatureCollection, Geometry, Position};
use serde::Serialize;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    DrawingBounds,
    DrawnBounds,
    SelectionRectangle,
    ExtrudePoints,
    GeometryToolFeatures,
}

impl OverlayKind {
    pub fn id(self) -> &'static str {
        match self {
            OverlayKind::DrawingBounds => OVERLAY_DRAWING_BOUNDS,
            OverlayKind::DrawnBounds => OVERLAY_DRAWN_BOUNDS,
            OverlayKind::SelectionRectangle => OVERLAY_SELECTION_RECTANGLE,
            OverlayKind::ExtrudePoints => OVERLAY_EXTRUDE_POINTS,
            OverlayKind::GeometryToolFeatures => OVERLAY_GEOMETRY_TOOL_FEATURES,
        }
    }
}

/// A derived render layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayLayer {
    pub kind: OverlayKind,
    pub id: &'static str,
    pub features: FeatureCollection,
    pub color: [u8; 4],
    /// Drawing mode the engine runs on this layer, for the editable drawing overlays
    pub mode: Option<DrawingModeKind>,
}

impl OverlayLayer {
    fn new(kind: OverlayKind, features: FeatureCollection, color: [u8; 4]) -> Self {
        Self {
            kind,
            id: kind.id(),
            features,
            color,
            mode: None,
        }
    }

    fn with_mode(mut self, mode: DrawingModeKind) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Every state value overlay synthesis reads.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayInputs {
    pub drawing_bounds: bool,
    pub selecting_by_area: bool,
    pub transient: FeatureCollection,
    pub mode: DrawingModeKind,
    pub drawn_rectangle: Option<BoundingBox>,
    pub extrude_selecting: bool,
    pub extrude_points: Vec<usize>,
    /// Exterior ring of the single polygon selected for edit
    pub extrude_ring: Option<Vec<Position>>,
    pub geometry_selecting: bool,
    pub geometry_features: Vec<SelectedFeature>,
}

impl OverlayInputs {
    pub fn capture(editing: &EditingState, drawing: &DrawingState, layers: &LayerStore) -> Self {
        let extrude_ring = match (editing.editable_layer_id(), editing.edit_selection()) {
            (Some(layer_id), [index]) => layers
                .get(layer_id)
                .and_then(|layer| layer.features.get(*index))
                .and_then(|feature| feature.geometry.as_ref())
                .and_then(Geometry::exterior_ring)
                .map(<[Position]>::to_vec),
            _ => None,
        };

        Self {
            drawing_bounds: drawing.is_drawing_bounds(),
            selecting_by_area: editing.edit_mode().is_view() && editing.basic_tool() == BasicTool::SelectByArea,
            transient: drawing.transient().clone(),
            mode: drawing.mode().kind(),
            drawn_rectangle: drawing.drawn_rectangle().copied(),
            extrude_selecting: drawing.is_extrude_selecting(),
            extrude_points: drawing.extrude_points().to_vec(),
            extrude_ring,
            geometry_selecting: drawing.is_geometry_selecting(),
            geometry_features: drawing.geometry_features().to_vec(),
        }
    }
}

/// Synthesized overlays, each present only while its conditions hold.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Overlays {
    pub drawing_bounds: Option<OverlayLayer>,
    pub drawn_bounds: Option<OverlayLayer>,
    pub selection_rectangle: Option<OverlayLayer>,
    pub extrude_points: Option<OverlayLayer>,
    pub geometry_tool_features: Option<OverlayLayer>,
}

impl Overlays {
    /// Present overlays in paint order
    pub fn iter(&self) -> impl Iterator<Item = &OverlayLayer> {
        [
            &self.drawn_bounds,
            &self.selection_rectangle,
            &self.geometry_tool_features,
            &self.extrude_points,
            &self.drawing_bounds,
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

pub fn synthesize(inputs: &OverlayInputs) -> Overlays {
    profile_scope!("synthesize_overlays");

    Overlays {
        drawing_bounds: drawing_bounds(inputs),
        drawn_bounds: drawn_bounds(inputs),
        selection_rectangle: selection_rectangle(inputs),
        extrude_points: extrude_points(inputs),
        geometry_tool_features: geometry_tool_features(inputs),
    }
}

fn drawing_bounds(inputs: &OverlayInputs) -> Option<OverlayLayer> {
    if !inputs.drawing_bounds {
        return None;
    }
    Some(OverlayLayer::new(OverlayKind::DrawingBounds, inputs.transient.clone(), DRAWN_BOUNDS_COLOR).with_mode(inputs.mode))
}

fn drawn_bounds(inputs: &OverlayInputs) -> Option<OverlayLayer> {
    if inputs.drawing_bounds {
        return None;
    }
    let rectangle = inputs.drawn_rectangle.as_ref()?;
    let feature = Feature::new(rectangle_polygon(rectangle));
    Some(OverlayLayer::new(OverlayKind::DrawnBounds, FeatureCollection::single(feature), DRAWN_BOUNDS_COLOR))
}

fn selection_rectangle(inputs: &OverlayInputs) -> Option<OverlayLayer> {
    if !inputs.selecting_by_area {
        return None;
    }
    Some(
        OverlayLayer::new(OverlayKind::SelectionRectangle, inputs.transient.clone(), SELECTION_RECTANGLE_COLOR)
            .with_mode(inputs.mode),
    )
}

fn extrude_points(inputs: &OverlayInputs) -> Option<OverlayLayer> {
    if !inputs.extrude_selecting || inputs.extrude_points.is_empty() {
        return None;
    }
    let ring = inputs.extrude_ring.as_ref()?;
    let markers = inputs
        .extrude_points
        .iter()
        .map(|&vertex| ring.get(vertex).map(|p| Feature::new(Geometry::Point(*p)).with_property("vertex", vertex)))
        .collect::<Option<Vec<_>>>()?;
    Some(OverlayLayer::new(OverlayKind::ExtrudePoints, FeatureCollection::new(markers), HIGHLIGHT_COLOR))
}

fn geometry_tool_features(inputs: &OverlayInputs) -> Option<OverlayLayer> {
    if !inputs.geometry_selecting || inputs.geometry_features.is_empty() {
        return None;
    }
    let features = inputs
        .geometry_features
        .iter()
        .map(|selected| selected.feature.clone())
        .collect();
    Some(OverlayLayer::new(
        OverlayKind::GeometryToolFeatures,
        FeatureCollection::new(features),
        HIGHLIGHT_COLOR,
    ))
}

/// Memoizes [`synthesize`] on its inputs.
#[derive(Debug, Default)]
pub struct OverlayCache {
    inputs: Option<OverlayInputs>,
    overlays: Overlays,
    recomputations: u64,
}

impl OverlayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays for `inputs`, recomputed only when they differ from the
    /// previous call's.
    pub fn get(&mut self, inputs: OverlayInputs) -> &Overlays {
        if self.inputs.as_ref() != Some(&inputs) {
            self.overlays = synthesize(&inputs);
            self.inputs = Some(inputs);
            self.recomputations += 1;
            trace!(recomputations = self.recomputations, "Recomputed overlays");
        }
        &self.overlays
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn invalidate(&mut self) {
        self.inputs = None;
    }
}
