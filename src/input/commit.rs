//! Edit-commit handling - drag tracking, geometry replacement and selection
//! updates driven by the rendering engine's edit events.
//!
//! Replacing a layer's features is the only path by which user interaction
//! mutates geometry. Every replacement bumps the update counter and drops
//! selection indexes that no longer resolve.

use super::events::{EditEvent, EditType};
use crate::geometry::haversine_distance;
use crate::layers::LayerStore;
use crate::{profile_function, profile_scope};
use crate::state::{DrawingState, EditingState, MoveSelection};
use crate::types::LayerId;
use tracing::{debug, warn};

/// Apply a structural edit event against the editable layer.
/// Returns true when layer geometry was replaced.
pub fn handle_edit_commit(
    event: &EditEvent,
    editing: &mut EditingState,
    drawing: &mut DrawingState,
    layers: &mut LayerStore,
) -> bool {
    profile_scope!("handle_edit_commit");

    track_drag(event, editing);

    let mut replaced = false;
    if let Some(data) = event.updated_data.as_ref().filter(|_| event.edit_type.replaces_geometry()) {
        match editing.editable_layer_id().cloned() {
            Some(layer_id) if layers.replace_features(&layer_id, data.clone()) => {
                editing.increment_update_counter();
                debug!(
                    layer = %layer_id,
                    edit = ?event.edit_type,
                    features = data.len(),
                    counter = editing.update_counter(),
                    "Replaced layer features"
                );
                replaced = true;
            }
            Some(layer_id) => debug!(layer = %layer_id, "Edit commit for unknown layer ignored"),
            None => debug!(edit = ?event.edit_type, "Edit commit without editable layer ignored"),
        }
    }

    let selection_changed = if event.edit_context.selected_feature_indexes.is_some()
        || event.edit_type.is_selection_change()
    {
        // The top-level indexes only stand in when the context carries none
        let next = event
            .edit_context
            .selected_feature_indexes
            .clone()
            .unwrap_or_else(|| event.selected_feature_indexes.clone());
        let before = editing.edit_selection().to_vec();
        editing.set_edit_selection(next);
        before.as_slice() != editing.edit_selection()
    } else {
        false
    };

    if selection_changed {
        drawing.clear_extrude_points();
    }

    if replaced || selection_changed {
        if let Some(layer_id) = editing.editable_layer_id().cloned() {
            prune_stale_indexes(&layer_id, editing, drawing, layers);
        }
    }

    replaced
}

/// Apply a basic-move edit against the layer targeted by the move selection.
/// Returns true when layer geometry was replaced.
pub fn handle_basic_move_commit(
    event: &EditEvent,
    editing: &mut EditingState,
    drawing: &mut DrawingState,
    layers: &mut LayerStore,
) -> bool {
    profile_function!();

    if !event.edit_type.is_basic_move() {
        return false;
    }
    let Some(data) = &event.updated_data else {
        return false;
    };
    let Some(layer_id) = editing.move_selection().layer_id.clone() else {
        warn!(
            edit = ?event.edit_type,
            selected = editing.move_selection().len(),
            "Basic move commit has no target layer, dropping it"
        );
        return false;
    };

    if !layers.replace_features(&layer_id, data.clone()) {
        debug!(layer = %layer_id, "Basic move commit for unknown layer ignored");
        return false;
    }
    editing.increment_update_counter();
    debug!(layer = %layer_id, counter = editing.update_counter(), "Moved features");

    prune_stale_indexes(&layer_id, editing, drawing, layers);
    true
}

fn track_drag(event: &EditEvent, editing: &mut EditingState) {
    if event.edit_type == EditType::MovePosition {
        if let Some(position) = event.edit_context.position {
            match editing.drag().start {
                None => {
                    editing.set_drag_start(Some(position));
                    editing.set_drag_distance(Some(0.0));
                }
                Some(start) => editing.set_drag_distance(Some(haversine_distance(start, position))),
            }
        }
    }

    if event.edit_type.ends_drag() {
        editing.clear_drag();
    }
}

/// Drop every selection index that no longer resolves on `layer_id`.
pub(crate) fn prune_stale_indexes(
    layer_id: &LayerId,
    editing: &mut EditingState,
    drawing: &mut DrawingState,
    layers: &LayerStore,
) {
    let Some(layer) = layers.get(layer_id) else {
        return;
    };
    let count = layer.feature_count();
    let is_editable = editing.editable_layer_id() == Some(layer_id);

    if is_editable && editing.edit_selection().iter().any(|&i| i >= count) {
        let before = editing.edit_selection().len();
        editing.edit_selection_mut().retain(|&i| i < count);
        debug!(layer = %layer_id, dropped = before - editing.edit_selection().len(), "Dropped stale edit indexes");
        drawing.clear_extrude_points();
    }

    if editing.move_selection().targets(layer_id) && editing.move_selection().indexes.iter().any(|&i| i >= count) {
        let indexes = editing
            .move_selection()
            .indexes
            .iter()
            .copied()
            .filter(|&i| i < count)
            .collect();
        editing.set_move_selection(MoveSelection {
            layer_id: Some(layer_id.clone()),
            indexes,
        });
        normalize_empty_move_selection(editing);
    }

    match editing.edit_selection() {
        _ if !is_editable => {}
        [single] => {
            let ring_len = layer
                .features
                .get(*single)
                .and_then(|feature| feature.geometry.as_ref())
                .and_then(|geometry| geometry.exterior_ring())
                .map_or(0, <[_]>::len);
            drawing.retain_extrude_points(ring_len);
        }
        _ => drawing.clear_extrude_points(),
    }

    drawing.retain_geometry_features(layer_id, count);
}

fn normalize_empty_move_selection(editing: &mut EditingState) {
    if editing.move_selection().is_empty() && editing.move_selection().layer_id.is_some() {
        editing.set_move_selection(MoveSelection::empty());
    }
}
