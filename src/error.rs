//! Error types for fallible editor operations
//!
//! Pointer handling itself never fails (misses and unknown layers are valid
//! no-op branches); errors only surface from the layer store and from
//! settings I/O.

use crate::types::LayerId;
use thiserror::Error;

/// Errors that can occur outside the event-handling path
#[derive(Error, Debug)]
pub enum EditorError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A layer with this id is already in the store
    #[error("Layer already exists: {0}")]
    DuplicateLayer(LayerId),

    /// No layer with this id is in the store
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),

    /// The platform config directory could not be determined
    #[error("No config directory available for settings")]
    SettingsPath,
}

/// Result type alias for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
