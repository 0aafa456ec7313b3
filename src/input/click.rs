//! Click dispatch - an ordered table of guarded rules, first match wins.
//!
//! Several modes can be active at once in the UI (a basic tool stays set
//! while an edit mode is chosen, a geometry tool session overlaps an edit
//! mode, ...). The table order decides which of them reacts to a click.
//!
//! ```text
//!  #  rule                        guard
//!  1  IgnoreWhileDrawingBounds    bounds drawing active
//!  2  IgnoreWhileSelectingByArea  view + selectByArea
//!  3  Inspect                     view + view
//!  4  ToggleMoveSelection         view + select
//!  5  ToggleEditSelection         select mode, editable layer set
//!  6  PickExtrudeVertex           extrude session, editable layer, one feature selected
//!  7  ToggleGeometryFeature       geometry tool session, click hit a feature
//!  8  SelectForEdit               edit mode is not view
//!  9  InspectFallback             always
//! ```

use super::events::ClickEvent;
use crate::geometry::nearest_vertex;
use crate::layers::LayerStore;
use crate::profile_scope;
use crate::state::{
    DrawingState, EditingState, InspectedFeature, MoveSelection, SelectedFeature, toggle_in_ordered_set,
};
use crate::types::{BasicTool, EditMode, LayerId};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickRule {
    IgnoreWhileDrawingBounds,
    IgnoreWhileSelectingByArea,
    Inspect,
    ToggleMoveSelection,
    ToggleEditSelection,
    PickExtrudeVertex,
    ToggleGeometryFeature,
    SelectForEdit,
    InspectFallback,
}

/// Click rules in priority order
pub const CLICK_RULES: [ClickRule; 9] = [
    ClickRule::IgnoreWhileDrawingBounds,
    ClickRule::IgnoreWhileSelectingByArea,
    ClickRule::Inspect,
    ClickRule::ToggleMoveSelection,
    ClickRule::ToggleEditSelection,
    ClickRule::PickExtrudeVertex,
    ClickRule::ToggleGeometryFeature,
    ClickRule::SelectForEdit,
    ClickRule::InspectFallback,
];

/// Mutable state a click rule may write to.
pub struct ClickContext<'a> {
    pub editing: &'a mut EditingState,
    pub drawing: &'a mut DrawingState,
    pub layers: &'a LayerStore,
    pub vertex_threshold_deg: f64,
}

impl ClickRule {
    pub fn name(self) -> &'static str {
        match self {
            ClickRule::IgnoreWhileDrawingBounds => "ignore-while-drawing-bounds",
            ClickRule::IgnoreWhileSelectingByArea => "ignore-while-selecting-by-area",
            ClickRule::Inspect => "inspect",
            ClickRule::ToggleMoveSelection => "toggle-move-selection",
            ClickRule::ToggleEditSelection => "toggle-edit-selection",
            ClickRule::PickExtrudeVertex => "pick-extrude-vertex",
            ClickRule::ToggleGeometryFeature => "toggle-geometry-feature",
            ClickRule::SelectForEdit => "select-for-edit",
            ClickRule::InspectFallback => "inspect-fallback",
        }
    }

    /// Whether this rule claims the click
    pub fn guard(self, event: &ClickEvent, editing: &EditingState, drawing: &DrawingState) -> bool {
        let mode = editing.edit_mode();
        let tool = editing.basic_tool();
        match self {
            ClickRule::IgnoreWhileDrawingBounds => drawing.is_drawing_bounds(),
            ClickRule::IgnoreWhileSelectingByArea => mode.is_view() && tool == BasicTool::SelectByArea,
            ClickRule::Inspect => mode.is_view() && tool == BasicTool::View,
            ClickRule::ToggleMoveSelection => mode.is_view() && tool == BasicTool::Select,
            ClickRule::ToggleEditSelection => mode == EditMode::Select && editing.editable_layer_id().is_some(),
            ClickRule::PickExtrudeVertex => {
                drawing.is_extrude_selecting()
                    && editing.editable_layer_id().is_some()
                    && editing.edit_selection().len() == 1
            }
            ClickRule::ToggleGeometryFeature => drawing.is_geometry_selecting() && event.is_hit(),
            ClickRule::SelectForEdit => !mode.is_view(),
            ClickRule::InspectFallback => true,
        }
    }

    pub fn apply(self, event: &ClickEvent, ctx: &mut ClickContext<'_>) {
        match self {
            ClickRule::IgnoreWhileDrawingBounds | ClickRule::IgnoreWhileSelectingByArea => {}
            ClickRule::Inspect | ClickRule::InspectFallback => inspect(event, ctx.editing),
            ClickRule::ToggleMoveSelection => {
                let hit = event.layer.clone().zip(event.index).filter(|_| event.is_hit());
                let next = toggle_selection(ctx.editing.move_selection(), hit, event.shift_key);
                if &next != ctx.editing.move_selection() {
                    ctx.editing.clear_drag();
                }
                ctx.editing.set_move_selection(next);
            }
            ClickRule::ToggleEditSelection => toggle_edit_selection(event, ctx),
            ClickRule::PickExtrudeVertex => pick_extrude_vertex(event, ctx),
            ClickRule::ToggleGeometryFeature => {
                let (Some(feature), Some(index), Some(layer_id)) = (&event.object, event.index, &event.layer) else {
                    return;
                };
                let selected = ctx.drawing.toggle_geometry_feature(SelectedFeature {
                    layer_id: layer_id.clone(),
                    index,
                    feature: feature.clone(),
                });
                debug!(layer = %layer_id, index, selected, "Toggled geometry tool feature");
            }
            ClickRule::SelectForEdit => {
                let next = editable_hit(event, ctx.editing).map(|index| vec![index]).unwrap_or_default();
                replace_edit_selection(ctx, next);
            }
        }
    }
}

/// First rule whose guard holds. The fallback rule always matches.
pub fn matching_rule(event: &ClickEvent, editing: &EditingState, drawing: &DrawingState) -> ClickRule {
    CLICK_RULES
        .into_iter()
        .find(|rule| rule.guard(event, editing, drawing))
        .unwrap_or(ClickRule::InspectFallback)
}

/// Run the first matching rule and report which one it was.
pub fn handle_click(event: &ClickEvent, ctx: &mut ClickContext<'_>) -> ClickRule {
    profile_scope!("handle_click");

    let rule = matching_rule(event, ctx.editing, ctx.drawing);
    debug!(rule = rule.name(), hit = event.is_hit(), shift = event.shift_key, "Click rule matched");
    rule.apply(event, ctx);
    rule
}

/// Multi-select toggle against a layer-targeted index set.
///
/// `hit` is the clicked `(layer, index)`, `None` on a miss. Removing with
/// shift keeps the layer target only while more than one index remains; a
/// remaining singleton loses its target. Adding always targets the clicked
/// layer.
pub fn toggle_selection(current: &MoveSelection, hit: Option<(LayerId, usize)>, shift: bool) -> MoveSelection {
    let Some((layer, index)) = hit else {
        return MoveSelection::empty();
    };

    let on_layer = current.targets(&layer);

    if !on_layer && !shift {
        return MoveSelection::new(layer, vec![index]);
    }

    if shift && (on_layer || current.layer_id.is_none()) {
        let mut indexes = current.indexes.clone();
        if toggle_in_ordered_set(&mut indexes, index) {
            return MoveSelection {
                layer_id: Some(layer),
                indexes,
            };
        }
        let layer_id = (indexes.len() > 1).then_some(layer);
        return MoveSelection { layer_id, indexes };
    }

    if on_layer && current.indexes == [index] {
        MoveSelection::empty()
    } else {
        MoveSelection::new(layer, vec![index])
    }
}

fn inspect(event: &ClickEvent, editing: &mut EditingState) {
    let inspected = event.object.clone().map(|feature| InspectedFeature {
        layer_id: event.layer.clone(),
        index: event.index,
        feature,
    });
    editing.set_inspected(inspected);
}

/// Clicked index when the click landed on the editable layer. A click that
/// reports no layer is attributed to the editable one.
fn editable_hit(event: &ClickEvent, editing: &EditingState) -> Option<usize> {
    if !event.is_hit() {
        return None;
    }
    match (&event.layer, editing.editable_layer_id()) {
        (Some(clicked), Some(editable)) if clicked != editable => None,
        _ => event.index,
    }
}

fn toggle_edit_selection(event: &ClickEvent, ctx: &mut ClickContext<'_>) {
    let Some(layer) = ctx.editing.editable_layer_id().cloned() else {
        return;
    };
    let current = if ctx.editing.edit_selection().is_empty() {
        MoveSelection::empty()
    } else {
        MoveSelection {
            layer_id: Some(layer.clone()),
            indexes: ctx.editing.edit_selection().to_vec(),
        }
    };
    let hit = editable_hit(event, ctx.editing).map(|index| (layer, index));
    let next = toggle_selection(&current, hit, event.shift_key);
    replace_edit_selection(ctx, next.indexes);
}

fn replace_edit_selection(ctx: &mut ClickContext<'_>, indexes: Vec<usize>) {
    if indexes.as_slice() == ctx.editing.edit_selection() {
        return;
    }
    ctx.editing.set_edit_selection(indexes);
    ctx.editing.clear_drag();
    // Extrude points index into the previously selected polygon
    ctx.drawing.clear_extrude_points();
}

fn pick_extrude_vertex(event: &ClickEvent, ctx: &mut ClickContext<'_>) {
    let (Some(layer_id), Some(coordinate)) = (ctx.editing.editable_layer_id(), event.coordinate) else {
        return;
    };
    let Some(&selected) = ctx.editing.edit_selection().first() else {
        return;
    };
    let ring = ctx
        .layers
        .get(layer_id)
        .and_then(|layer| layer.features.get(selected))
        .and_then(|feature| feature.geometry.as_ref())
        .and_then(|geometry| geometry.exterior_ring());
    let Some(ring) = ring else {
        trace!(index = selected, "Extrude pick ignored, selection is not a polygon");
        return;
    };

    match nearest_vertex(ring, coordinate) {
        Some((vertex, distance)) if distance < ctx.vertex_threshold_deg => {
            let selected = ctx.drawing.toggle_extrude_point(vertex);
            debug!(vertex, distance, selected, "Toggled extrude vertex");
        }
        _ => trace!("Extrude pick missed every vertex"),
    }
}
