//! Structured pointer and edit-commit payloads from the rendering engine.

use crate::types::{Feature, FeatureCollection, LayerId, Position};
use serde::{Deserialize, Serialize};

/// A pointer click, hit or miss.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Feature under the pointer
    pub object: Option<Feature>,
    /// Index of `object` within its layer
    pub index: Option<usize>,
    pub layer: Option<LayerId>,
    /// Geographic position of the click
    pub coordinate: Option<Position>,
    #[serde(default)]
    pub shift_key: bool,
}

impl ClickEvent {
    pub fn hit(layer: impl Into<LayerId>, index: usize, object: Feature) -> Self {
        Self {
            object: Some(object),
            index: Some(index),
            layer: Some(layer.into()),
            coordinate: None,
            shift_key: false,
        }
    }

    pub fn miss() -> Self {
        Self::default()
    }

    pub fn at(mut self, coordinate: Position) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// A click counts as a hit only when both the feature and its index are known
    pub fn is_hit(&self) -> bool {
        self.object.is_some() && self.index.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub object: Option<Feature>,
}

impl HoverEvent {
    pub fn hit(object: Feature) -> Self {
        Self { object: Some(object) }
    }

    pub fn miss() -> Self {
        Self::default()
    }

    pub fn is_hit(&self) -> bool {
        self.object.is_some()
    }
}

/// Kind of edit the rendering engine reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditType {
    AddFeature,
    RemoveFeature,
    AddPosition,
    RemovePosition,
    MovePosition,
    FinishMovePosition,
    Translating,
    Translated,
    Scaling,
    Scaled,
    Rotating,
    Rotated,
    Extruded,
    Split,
    Edit,
    Select,
    Deselect,
    AddTentativePosition,
    UpdateTentativeFeature,
    CancelFeature,
}

impl EditType {
    /// Committed edits whose `updated_data` replaces the layer's features
    pub fn replaces_geometry(self) -> bool {
        matches!(
            self,
            EditType::AddFeature
                | EditType::RemoveFeature
                | EditType::FinishMovePosition
                | EditType::MovePosition
                | EditType::Translated
                | EditType::Scaled
                | EditType::Rotated
                | EditType::AddPosition
                | EditType::RemovePosition
                | EditType::Extruded
                | EditType::Split
                | EditType::Edit
        )
    }

    /// Edits the basic move commit reacts to
    pub fn is_basic_move(self) -> bool {
        matches!(
            self,
            EditType::MovePosition | EditType::FinishMovePosition | EditType::Translated
        )
    }

    /// Gesture ends that reset the drag tracker
    pub fn ends_drag(self) -> bool {
        matches!(
            self,
            EditType::FinishMovePosition | EditType::Select | EditType::Deselect
        )
    }

    pub fn is_selection_change(self) -> bool {
        matches!(self, EditType::Select | EditType::Deselect)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditContext {
    pub position: Option<Position>,
    pub selected_feature_indexes: Option<Vec<usize>>,
    /// Indexes of the features the edit touched
    pub feature_indexes: Option<Vec<usize>>,
}

/// An edit-commit notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub edit_type: EditType,
    pub updated_data: Option<FeatureCollection>,
    /// Fallback selection for `select`/`deselect` when the context has none
    #[serde(default)]
    pub selected_feature_indexes: Vec<usize>,
    #[serde(default)]
    pub edit_context: EditContext,
}

impl EditEvent {
    pub fn new(edit_type: EditType) -> Self {
        Self {
            edit_type,
            updated_data: None,
            selected_feature_indexes: Vec::new(),
            edit_context: EditContext::default(),
        }
    }

    pub fn with_data(mut self, data: FeatureCollection) -> Self {
        self.updated_data = Some(data);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.edit_context.position = Some(position);
        self
    }

    pub fn with_context_selection(mut self, indexes: Vec<usize>) -> Self {
        self.edit_context.selected_feature_indexes = Some(indexes);
        self
    }

    /// The feature an `addFeature` edit appended, read from `updated_data`
    /// through the context's touched indexes (falling back to the last feature).
    pub fn added_feature(&self) -> Option<&Feature> {
        let data = self.updated_data.as_ref()?;
        match self.edit_context.feature_indexes.as_deref() {
            Some([.., last]) => data.get(*last),
            _ => data.features.last(),
        }
    }
}
