//! Drawing state - rectangle drawing sessions and geometry tool selections.
//!
//! ## Session Transitions
//!
//! ```text
//! Idle -> DrawingBounds        (start_bounds_drawing, clears DrawnRectangle)
//! DrawingBounds -> Idle        (finish_bounds_drawing, keeps DrawnRectangle)
//! DrawingBounds -> Idle        (cancel_bounds_drawing, full rollback)
//! Idle -> SelectingByArea      (start_area_selection)
//! SelectingByArea -> Idle      (finish_area_selection)
//! ```

use super::toggle_in_ordered_set;
use crate::types::{BoundingBox, Feature, FeatureCollection, GeometryTool, LayerId};
use serde::{Deserialize, Serialize};

/// What a drawing-mode handle asks the rendering engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawingModeKind {
    View,
    DrawRectangle,
}

/// Opaque drawing-mode token owned by the rendering engine.
///
/// The core only stores and swaps handles; the engine maps [`kind`] to its
/// own mode object.
///
/// [`kind`]: DrawingModeHandle::kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawingModeHandle(DrawingModeKind);

impl DrawingModeHandle {
    pub fn view() -> Self {
        Self(DrawingModeKind::View)
    }

    pub fn draw_rectangle() -> Self {
        Self(DrawingModeKind::DrawRectangle)
    }

    pub fn kind(&self) -> DrawingModeKind {
        self.0
    }
}

impl Default for DrawingModeHandle {
    fn default() -> Self {
        Self::view()
    }
}

/// Which rectangle a drawing session produces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawingKind {
    Bounds,
    AreaSelect,
}

/// A whole feature picked for a geometry tool, identified by layer and index.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFeature {
    pub layer_id: LayerId,
    pub index: usize,
    pub feature: Feature,
}

impl SelectedFeature {
    fn same_identity(&self, other: &SelectedFeature) -> bool {
        self.layer_id == other.layer_id && self.index == other.index
    }
}

#[derive(Clone, Debug, Default)]
pub struct DrawingState {
    drawing_bounds: bool,
    selecting_by_area: bool,
    transient: FeatureCollection,
    mode: DrawingModeHandle,
    drawn_rectangle: Option<BoundingBox>,
    active_tool: Option<GeometryTool>,
    extrude_selecting: bool,
    extrude_points: Vec<usize>,
    geometry_selecting: bool,
    geometry_features: Vec<SelectedFeature>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Rectangle drawing sessions
    // ------------------------------------------------------------------

    pub fn is_drawing_bounds(&self) -> bool {
        self.drawing_bounds
    }

    pub fn is_selecting_by_area(&self) -> bool {
        self.selecting_by_area
    }

    /// The open drawing session, bounds drawing taking precedence
    pub fn session(&self) -> Option<DrawingKind> {
        if self.drawing_bounds {
            Some(DrawingKind::Bounds)
        } else if self.selecting_by_area {
            Some(DrawingKind::AreaSelect)
        } else {
            None
        }
    }

    pub fn start_bounds_drawing(&mut self) {
        self.drawing_bounds = true;
        self.drawn_rectangle = None;
        self.transient = FeatureCollection::empty();
        self.mode = DrawingModeHandle::draw_rectangle();
    }

    /// Ends the session; the rectangle committed before this call stays.
    pub fn finish_bounds_drawing(&mut self) {
        self.drawing_bounds = false;
    }

    /// Rolls back every artifact of a bounds-drawing session at once.
    pub fn cancel_bounds_drawing(&mut self) {
        self.drawing_bounds = false;
        self.drawn_rectangle = None;
        self.transient = FeatureCollection::empty();
        self.mode = DrawingModeHandle::view();
    }

    pub fn start_area_selection(&mut self) {
        self.selecting_by_area = true;
        self.transient = FeatureCollection::empty();
        self.mode = DrawingModeHandle::draw_rectangle();
    }

    pub fn finish_area_selection(&mut self) {
        self.selecting_by_area = false;
        self.transient = FeatureCollection::empty();
        self.mode = DrawingModeHandle::view();
    }

    pub fn transient(&self) -> &FeatureCollection {
        &self.transient
    }

    pub fn set_transient(&mut self, collection: FeatureCollection) {
        self.transient = collection;
    }

    pub fn clear_transient(&mut self) {
        self.transient = FeatureCollection::empty();
    }

    pub fn mode(&self) -> DrawingModeHandle {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawingModeHandle) {
        self.mode = mode;
    }

    pub fn drawn_rectangle(&self) -> Option<&BoundingBox> {
        self.drawn_rectangle.as_ref()
    }

    pub fn set_drawn_rectangle(&mut self, rectangle: Option<BoundingBox>) {
        self.drawn_rectangle = rectangle;
    }

    pub fn clear_drawn_rectangle(&mut self) {
        self.drawn_rectangle = None;
    }

    // ------------------------------------------------------------------
    // Geometry tools
    // ------------------------------------------------------------------

    pub fn active_tool(&self) -> Option<GeometryTool> {
        self.active_tool
    }

    pub fn set_active_tool(&mut self, tool: Option<GeometryTool>) {
        self.active_tool = tool;
    }

    pub fn is_extrude_selecting(&self) -> bool {
        self.extrude_selecting
    }

    pub fn start_extrude_selection(&mut self) {
        self.extrude_selecting = true;
        self.extrude_points.clear();
    }

    pub fn finish_extrude_selection(&mut self) {
        self.extrude_selecting = false;
        self.extrude_points.clear();
    }

    /// Exterior-ring vertex indexes, ascending
    pub fn extrude_points(&self) -> &[usize] {
        &self.extrude_points
    }

    pub fn toggle_extrude_point(&mut self, vertex: usize) -> bool {
        toggle_in_ordered_set(&mut self.extrude_points, vertex)
    }

    pub fn clear_extrude_points(&mut self) {
        self.extrude_points.clear();
    }

    pub(crate) fn retain_extrude_points(&mut self, ring_len: usize) {
        self.extrude_points.retain(|&vertex| vertex < ring_len);
    }

    pub fn is_geometry_selecting(&self) -> bool {
        self.geometry_selecting
    }

    pub fn start_geometry_selection(&mut self) {
        self.geometry_selecting = true;
        self.geometry_features.clear();
    }

    pub fn finish_geometry_selection(&mut self) {
        self.geometry_selecting = false;
        self.geometry_features.clear();
    }

    pub fn geometry_features(&self) -> &[SelectedFeature] {
        &self.geometry_features
    }

    /// Add the feature, or remove it when one with the same layer and index
    /// is already selected. Returns true when it is selected afterwards.
    pub fn toggle_geometry_feature(&mut self, selected: SelectedFeature) -> bool {
        if let Some(position) = self
            .geometry_features
            .iter()
            .position(|existing| existing.same_identity(&selected))
        {
            self.geometry_features.remove(position);
            false
        } else {
            self.geometry_features.push(selected);
            true
        }
    }

    pub(crate) fn retain_geometry_features(&mut self, layer_id: &LayerId, feature_count: usize) {
        self.geometry_features
            .retain(|selected| &selected.layer_id != layer_id || selected.index < feature_count);
    }
}
