//! Rectangle completion for drawing sessions.
//!
//! Completion is two-phase. The commit phase runs inside the edit event:
//! it publishes the rectangle (or the area selection) and returns the
//! [`DeferredStep`] that closes the session. The finalize phase runs that
//! step on the next [`crate::session::Session::tick`].

use super::events::{EditEvent, EditType};
use crate::geometry::geometry_bounds;
use crate::layers::LayerStore;
use crate::{profile_function, profile_scope};
use crate::state::{DrawingKind, DrawingModeHandle, DrawingState, EditingState, MoveSelection};
use crate::types::{BasicTool, BoundingBox};
use tracing::{debug, trace};

/// Work postponed to the tick after a rectangle was committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredStep {
    FinishBoundsDrawing,
    ClearAreaSelection,
}

impl DeferredStep {
    pub fn run(self, drawing: &mut DrawingState) {
        match self {
            DeferredStep::FinishBoundsDrawing => drawing.finish_bounds_drawing(),
            DeferredStep::ClearAreaSelection => drawing.finish_area_selection(),
        }
        trace!(step = ?self, "Ran deferred drawing step");
    }
}

/// Feed an edit event to the open drawing session, if any.
///
/// Every event refreshes the transient collection. An `addFeature` carrying
/// a polygon completes the rectangle.
pub fn handle_drawing_edit(
    event: &EditEvent,
    editing: &mut EditingState,
    drawing: &mut DrawingState,
    layers: &LayerStore,
) -> Option<DeferredStep> {
    profile_function!();
    let session = drawing.session()?;

    if let Some(data) = &event.updated_data {
        drawing.set_transient(data.clone());
    }

    if event.edit_type != EditType::AddFeature {
        return None;
    }
    let geometry = event.added_feature()?.geometry.as_ref()?;
    if !geometry.is_polygon() {
        trace!(kind = geometry.type_name(), "Drawn feature is not a polygon");
        return None;
    }
    let bounds = geometry_bounds(geometry)?;

    match session {
        DrawingKind::Bounds => {
            drawing.set_drawn_rectangle(Some(bounds));
            drawing.set_mode(DrawingModeHandle::view());
            debug!(bounds = ?bounds.to_array(), "Bounds rectangle drawn");
            Some(DeferredStep::FinishBoundsDrawing)
        }
        DrawingKind::AreaSelect => {
            select_by_area(&bounds, editing, layers);
            Some(DeferredStep::ClearAreaSelection)
        }
    }
}

/// Select features touching `bounds` for moving.
///
/// Layers are scanned in order and the first one with any match becomes the
/// move target; matches on later layers are discarded. With no match at all
/// the move selection is cleared. Either way the basic tool switches to
/// select.
pub fn select_by_area(bounds: &BoundingBox, editing: &mut EditingState, layers: &LayerStore) {
    profile_scope!("select_by_area");

    let hit = layers.iter().find_map(|layer| {
        let indexes = layers.features_in_bounds(&layer.id, bounds);
        (!indexes.is_empty()).then(|| (layer.id.clone(), indexes))
    });

    let selection = match hit {
        Some((layer_id, indexes)) => {
            debug!(layer = %layer_id, count = indexes.len(), "Selected features by area");
            MoveSelection::new(layer_id, indexes)
        }
        None => {
            debug!(bounds = ?bounds.to_array(), "Area selection matched nothing");
            MoveSelection::empty()
        }
    };

    editing.set_move_selection(selection);
    editing.clear_drag();
    editing.set_basic_tool(BasicTool::Select);
}
