//! Editing state - modes, selections, drag tracking and the update counter.

use super::ordered_set;
use crate::types::{BasicTool, EditMode, Feature, LayerId, Position};
use serde::{Deserialize, Serialize};

/// Features picked for a non-structural move.
///
/// The empty form is `{layer_id: None, indexes: []}`. The reverse does not
/// hold: a non-empty set may have lost its layer target (see the
/// multi-select toggle in [`crate::input`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSelection {
    pub layer_id: Option<LayerId>,
    pub indexes: Vec<usize>,
}

impl MoveSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selection of `indexes` (normalized to an ordered set) on `layer_id`
    pub fn new(layer_id: impl Into<LayerId>, indexes: Vec<usize>) -> Self {
        Self {
            layer_id: Some(layer_id.into()),
            indexes: ordered_set(indexes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indexes.binary_search(&index).is_ok()
    }

    pub fn targets(&self, layer_id: &LayerId) -> bool {
        self.layer_id.as_ref() == Some(layer_id)
    }
}

/// In-progress drag gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DragTracker {
    pub start: Option<Position>,
    /// Great-circle distance from `start` to the latest position, meters
    pub distance_m: Option<f64>,
}

impl DragTracker {
    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

/// The single feature shown by hover-inspection clicks.
#[derive(Clone, Debug, PartialEq)]
pub struct InspectedFeature {
    pub layer_id: Option<LayerId>,
    pub index: Option<usize>,
    pub feature: Feature,
}

/// Structural and basic editing state.
#[derive(Clone, Debug, Default)]
pub struct EditingState {
    edit_mode: EditMode,
    basic_tool: BasicTool,
    editable_layer_id: Option<LayerId>,
    edit_selection: Vec<usize>,
    move_selection: MoveSelection,
    drag: DragTracker,
    update_counter: u64,
    inspected: Option<InspectedFeature>,
    hovered: Option<Feature>,
}

impl EditingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    pub fn basic_tool(&self) -> BasicTool {
        self.basic_tool
    }

    pub fn set_basic_tool(&mut self, tool: BasicTool) {
        self.basic_tool = tool;
    }

    pub fn editable_layer_id(&self) -> Option<&LayerId> {
        self.editable_layer_id.as_ref()
    }

    pub fn set_editable_layer_id(&mut self, id: Option<LayerId>) {
        self.editable_layer_id = id;
    }

    /// Feature indexes selected for structural editing, ascending
    pub fn edit_selection(&self) -> &[usize] {
        &self.edit_selection
    }

    pub fn set_edit_selection(&mut self, indexes: Vec<usize>) {
        self.edit_selection = ordered_set(indexes);
    }

    pub(crate) fn edit_selection_mut(&mut self) -> &mut Vec<usize> {
        &mut self.edit_selection
    }

    pub fn move_selection(&self) -> &MoveSelection {
        &self.move_selection
    }

    pub fn set_move_selection(&mut self, selection: MoveSelection) {
        self.move_selection = MoveSelection {
            layer_id: selection.layer_id,
            indexes: ordered_set(selection.indexes),
        };
    }

    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    pub fn set_drag_start(&mut self, start: Option<Position>) {
        self.drag.start = start;
    }

    pub fn set_drag_distance(&mut self, distance_m: Option<f64>) {
        self.drag.distance_m = distance_m;
    }

    pub fn clear_drag(&mut self) {
        self.drag = DragTracker::default();
    }

    /// Bumped once per geometry replacement
    pub fn update_counter(&self) -> u64 {
        self.update_counter
    }

    pub fn increment_update_counter(&mut self) {
        self.update_counter = self.update_counter.wrapping_add(1);
    }

    pub fn inspected(&self) -> Option<&InspectedFeature> {
        self.inspected.as_ref()
    }

    pub fn set_inspected(&mut self, inspected: Option<InspectedFeature>) {
        self.inspected = inspected;
    }

    pub fn hovered(&self) -> Option<&Feature> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, feature: Option<Feature>) {
        self.hovered = feature;
    }
}
