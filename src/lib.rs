//! Interaction core for selecting, moving, reshaping and drawing vector
//! features on a map canvas.
//!
//! The rendering engine feeds pointer and edit-commit events into a
//! [`Session`]; the session interprets them against the current edit mode
//! and basic tool, updates the editing and drawing state, replaces layer
//! geometry on committed edits, and hands back a cursor and the layers to
//! paint (data layers followed by synthesized overlays).

pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod logging;
pub mod overlays;
pub mod perf;
pub mod session;
pub mod settings;
pub mod spatial_index;
pub mod state;
pub mod types;
pub mod viewport;

pub use error::{EditorError, EditorResult};
pub use input::{ClickEvent, ClickRule, DeferredStep, EditContext, EditEvent, EditType, HoverEvent};
pub use layers::LayerStore;
pub use session::{EditOutcome, LayerDescriptor, SelectionSummary, Session};
pub use settings::EditorSettings;
pub use state::{DrawingState, EditingState, MoveSelection};
pub use types::{
    BasicTool, BoundingBox, Cursor, EditMode, Feature, FeatureCollection, Geometry, GeometryTool, Layer, LayerId,
    Position,
};
