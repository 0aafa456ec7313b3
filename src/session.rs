//! Editing session - owns the state stores and routes engine events.
//!
//! The session is the single writer of [`EditingState`], [`DrawingState`]
//! and the [`LayerStore`]. Rendering-engine events come in through the
//! `handle_*` methods, UI controls through the setters, and the engine reads
//! back a cursor and [`LayerDescriptor`]s for each frame.
//!
//! ## Deferred steps
//!
//! Completing a rectangle queues a [`DeferredStep`]. [`Session::tick`] runs
//! the steps queued before it was called; steps queued while ticking wait
//! for the next tick.

use crate::error::EditorResult;
use crate::input::{
    ClickContext, ClickEvent, ClickRule, DeferredStep, EditEvent, HoverEvent, handle_basic_move_commit, handle_click,
    handle_drawing_edit, handle_edit_commit, handle_hover,
};
use crate::layers::LayerStore;
use crate::overlays::{OverlayCache, OverlayInputs, OverlayLayer, Overlays};
use crate::perf::EventTimings;
use crate::settings::EditorSettings;
use crate::state::{DrawingState, EditingState, MoveSelection};
use crate::types::{BasicTool, BoundingBox, Cursor, EditMode, GeometryTool, Layer, LayerId};
use crate::viewport::{ViewTarget, Viewport, fit_bounds, fit_collection};
use std::collections::VecDeque;
use tracing::{debug, info};

/// What an edit event changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub geometry_changed: bool,
    /// Step queued for the next tick, when the event completed a rectangle
    pub deferred: Option<DeferredStep>,
}

/// One entry of the per-frame layer list.
#[derive(Clone, Copy, Debug)]
pub enum LayerDescriptor<'a> {
    Data {
        layer: &'a Layer,
        editable: bool,
        /// Indexes highlighted on this layer
        selected: &'a [usize],
        /// Changes whenever the layer's geometry may have changed
        update_counter: u64,
    },
    Overlay(&'a OverlayLayer),
}

impl LayerDescriptor<'_> {
    pub fn id(&self) -> &str {
        match self {
            LayerDescriptor::Data { layer, .. } => layer.id.as_str(),
            LayerDescriptor::Overlay(overlay) => overlay.id,
        }
    }
}

/// Read-only selection summary for UI controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSummary {
    pub edit_layer: Option<LayerId>,
    pub edit_count: usize,
    pub move_layer: Option<LayerId>,
    pub move_count: usize,
    pub extrude_points: usize,
    pub geometry_features: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    editing: EditingState,
    drawing: DrawingState,
    layers: LayerStore,
    settings: EditorSettings,
    overlays: OverlayCache,
    pending: VecDeque<DeferredStep>,
    timings: EventTimings,
}

impl Session {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_layers(settings: EditorSettings, layers: Vec<Layer>) -> Self {
        let mut session = Self::new(settings);
        session.layers.set_layers(layers);
        session
    }

    pub fn editing(&self) -> &EditingState {
        &self.editing
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Rendering engine events
    // ------------------------------------------------------------------

    pub fn handle_click(&mut self, event: &ClickEvent) -> ClickRule {
        let mut ctx = ClickContext {
            editing: &mut self.editing,
            drawing: &mut self.drawing,
            layers: &self.layers,
            vertex_threshold_deg: self.settings.vertex_pick_threshold_deg,
        };
        self.timings.time("click", || handle_click(event, &mut ctx))
    }

    pub fn handle_hover(&mut self, event: &HoverEvent) -> Cursor {
        handle_hover(event, &mut self.editing)
    }

    /// Route an edit event: to the open drawing session if there is one,
    /// otherwise to the editable layer.
    pub fn handle_edit(&mut self, event: &EditEvent) -> EditOutcome {
        if self.drawing.session().is_some() {
            let (editing, drawing, layers) = (&mut self.editing, &mut self.drawing, &self.layers);
            let deferred = self
                .timings
                .time("drawing_edit", || handle_drawing_edit(event, editing, drawing, layers));
            if let Some(step) = deferred {
                self.pending.push_back(step);
            }
            return EditOutcome {
                geometry_changed: false,
                deferred,
            };
        }

        let (editing, drawing, layers) = (&mut self.editing, &mut self.drawing, &mut self.layers);
        let geometry_changed = self
            .timings
            .time("edit_commit", || handle_edit_commit(event, editing, drawing, layers));
        EditOutcome {
            geometry_changed,
            deferred: None,
        }
    }

    /// Edit event from the basic move tool, applied to the move target layer.
    pub fn handle_basic_move_edit(&mut self, event: &EditEvent) -> bool {
        let (editing, drawing, layers) = (&mut self.editing, &mut self.drawing, &mut self.layers);
        self.timings
            .time("basic_move_commit", || handle_basic_move_commit(event, editing, drawing, layers))
    }

    pub fn timings(&self) -> &EventTimings {
        &self.timings
    }

    /// Run the deferred steps queued before this call. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let due = self.pending.len();
        for _ in 0..due {
            if let Some(step) = self.pending.pop_front() {
                step.run(&mut self.drawing);
            }
        }
        due
    }

    pub fn pending_steps(&self) -> impl Iterator<Item = &DeferredStep> {
        self.pending.iter()
    }

    // ------------------------------------------------------------------
    // UI controls
    // ------------------------------------------------------------------

    /// Switch edit mode. Clears the edit selection; entering or leaving the
    /// extrude and geometry tool modes opens or closes their sessions.
    pub fn set_edit_mode(&mut self, mode: EditMode) {
        let previous = self.editing.edit_mode();
        if mode == previous {
            return;
        }
        debug!(from = ?previous, to = ?mode, "Edit mode changed");
        self.editing.set_edit_mode(mode);
        self.editing.set_edit_selection(Vec::new());
        self.editing.clear_drag();

        if previous == EditMode::ExtrudeSelect {
            self.drawing.finish_extrude_selection();
        }
        if previous == EditMode::GeometryToolSelect {
            self.drawing.finish_geometry_selection();
        }
        match mode {
            EditMode::ExtrudeSelect => self.drawing.start_extrude_selection(),
            EditMode::GeometryToolSelect => self.drawing.start_geometry_selection(),
            _ => self.drawing.clear_extrude_points(),
        }

        if !mode.is_view() {
            self.end_area_selection();
        } else if self.editing.basic_tool() == BasicTool::SelectByArea {
            self.drawing.start_area_selection();
        }
    }

    /// Switch the basic tool. Choosing select-by-area in view mode opens an
    /// area selection session; leaving it closes the session. In any other
    /// mode the session waits until [`Session::set_edit_mode`] returns to view.
    pub fn set_basic_tool(&mut self, tool: BasicTool) {
        if tool == self.editing.basic_tool() {
            return;
        }
        debug!(from = ?self.editing.basic_tool(), to = ?tool, "Basic tool changed");
        self.editing.set_basic_tool(tool);
        self.editing.clear_drag();

        if tool == BasicTool::SelectByArea && self.editing.edit_mode().is_view() {
            self.drawing.start_area_selection();
        } else {
            self.end_area_selection();
        }
    }

    fn end_area_selection(&mut self) {
        if self.drawing.is_selecting_by_area() {
            self.drawing.finish_area_selection();
            self.pending.retain(|step| *step != DeferredStep::ClearAreaSelection);
        }
    }

    pub fn set_editable_layer(&mut self, id: Option<LayerId>) {
        if self.editing.editable_layer_id() == id.as_ref() {
            return;
        }
        info!(layer = ?id.as_ref().map(LayerId::as_str), "Editable layer changed");
        self.editing.set_editable_layer_id(id);
        self.editing.set_edit_selection(Vec::new());
        self.editing.clear_drag();
        self.drawing.clear_extrude_points();
    }

    /// Choose the geometry tool. Extrude collects vertices of the selected
    /// polygon, the other tools collect whole features; `None` closes both
    /// sessions. The edit selection is kept.
    pub fn set_active_tool(&mut self, tool: Option<GeometryTool>) {
        debug!(tool = ?tool, "Geometry tool changed");
        self.drawing.set_active_tool(tool);
        match tool {
            Some(GeometryTool::Extrude) => {
                self.drawing.finish_geometry_selection();
                self.drawing.start_extrude_selection();
            }
            Some(_) => {
                self.drawing.finish_extrude_selection();
                self.drawing.start_geometry_selection();
            }
            None => {
                self.drawing.finish_extrude_selection();
                self.drawing.finish_geometry_selection();
            }
        }
    }

    pub fn set_move_selection(&mut self, selection: MoveSelection) {
        self.editing.set_move_selection(selection);
        self.editing.clear_drag();
    }

    pub fn start_bounds_drawing(&mut self) {
        self.pending.retain(|step| *step != DeferredStep::FinishBoundsDrawing);
        self.drawing.start_bounds_drawing();
    }

    pub fn cancel_bounds_drawing(&mut self) {
        self.pending.retain(|step| *step != DeferredStep::FinishBoundsDrawing);
        self.drawing.cancel_bounds_drawing();
    }

    pub fn clear_drawn_rectangle(&mut self) {
        self.drawing.clear_drawn_rectangle();
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        self.layers.set_layers(layers);
        self.forget_missing_layers();
    }

    pub fn add_layer(&mut self, layer: Layer) -> EditorResult<()> {
        self.layers.add_layer(layer)
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> EditorResult<Layer> {
        let removed = self.layers.remove_layer(id)?;
        self.forget_missing_layers();
        Ok(removed)
    }

    /// Drop selections that point at layers no longer in the store.
    fn forget_missing_layers(&mut self) {
        if let Some(id) = self.editing.editable_layer_id().cloned() {
            if !self.layers.contains(&id) {
                self.set_editable_layer(None);
            }
        }
        let move_target_gone = self
            .editing
            .move_selection()
            .layer_id
            .as_ref()
            .is_some_and(|id| !self.layers.contains(id));
        if move_target_gone {
            self.set_move_selection(MoveSelection::empty());
        }
    }

    // ------------------------------------------------------------------
    // Frame output
    // ------------------------------------------------------------------

    pub fn overlays(&mut self) -> &Overlays {
        let inputs = OverlayInputs::capture(&self.editing, &self.drawing, &self.layers);
        self.overlays.get(inputs)
    }

    /// Data layers in store order followed by the present overlays.
    pub fn render_layers(&mut self) -> Vec<LayerDescriptor<'_>> {
        let inputs = OverlayInputs::capture(&self.editing, &self.drawing, &self.layers);
        let overlays = self.overlays.get(inputs);

        let editable = self.editing.editable_layer_id();
        let move_selection = self.editing.move_selection();
        let update_counter = self.editing.update_counter();

        let mut descriptors: Vec<LayerDescriptor<'_>> = self
            .layers
            .iter()
            .map(|layer| {
                let is_editable = editable == Some(&layer.id);
                let selected = if is_editable && !self.editing.edit_mode().is_view() {
                    self.editing.edit_selection()
                } else if move_selection.targets(&layer.id) {
                    move_selection.indexes.as_slice()
                } else {
                    &[]
                };
                LayerDescriptor::Data {
                    layer,
                    editable: is_editable,
                    selected,
                    update_counter,
                }
            })
            .collect();
        descriptors.extend(overlays.iter().map(LayerDescriptor::Overlay));
        descriptors
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        let move_selection = self.editing.move_selection();
        SelectionSummary {
            edit_layer: self.editing.editable_layer_id().cloned(),
            edit_count: self.editing.edit_selection().len(),
            move_layer: move_selection.layer_id.clone(),
            move_count: move_selection.len(),
            extrude_points: self.drawing.extrude_points().len(),
            geometry_features: self.drawing.geometry_features().len(),
        }
    }

    /// Camera target fitting a layer's features
    pub fn fit_layer(&self, id: &LayerId, viewport: Viewport) -> Option<ViewTarget> {
        let layer = self.layers.get(id)?;
        fit_collection(
            &layer.features,
            viewport,
            self.settings.fit_padding_px,
            self.settings.max_fit_zoom,
        )
    }

    /// Camera target fitting the drawn rectangle
    pub fn fit_drawn_rectangle(&self, viewport: Viewport) -> Option<ViewTarget> {
        let bounds: &BoundingBox = self.drawing.drawn_rectangle()?;
        fit_bounds(bounds, viewport, self.settings.fit_padding_px, self.settings.max_fit_zoom)
    }
}
