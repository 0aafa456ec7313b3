//! Editor settings persisted as JSON in the platform config directory.
//!
//! Missing fields fall back to their defaults, so older settings files keep
//! loading after new knobs are added.

use crate::constants::{
    DEFAULT_FIT_PADDING_PX, DEFAULT_LAYER_COLOR, DEFAULT_LOG_FILTER, DEFAULT_MAX_FIT_ZOOM, SETTINGS_DIR_NAME,
    SETTINGS_FILE_NAME, VERTEX_PICK_THRESHOLD_DEG,
};
use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Max degree-space distance for an extrude vertex pick
    pub vertex_pick_threshold_deg: f64,
    pub fit_padding_px: f64,
    pub max_fit_zoom: f64,
    /// `tracing` filter directive; `RUST_LOG` wins when set
    pub log_filter: String,
    pub default_layer_color: [u8; 4],
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            vertex_pick_threshold_deg: VERTEX_PICK_THRESHOLD_DEG,
            fit_padding_px: DEFAULT_FIT_PADDING_PX,
            max_fit_zoom: DEFAULT_MAX_FIT_ZOOM,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_layer_color: DEFAULT_LAYER_COLOR,
        }
    }
}

/// `<config dir>/geoedit/settings.json`
pub fn default_settings_path() -> EditorResult<PathBuf> {
    let dir = dirs::config_dir().ok_or(EditorError::SettingsPath)?;
    Ok(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
}

impl EditorSettings {
    pub fn load(path: &Path) -> EditorResult<Self> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded editor settings");
        Ok(settings)
    }

    /// Load, falling back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write atomically: serialize into a temp file next to `path`, then
    /// rename it over the old file.
    pub fn save(&self, path: &Path) -> EditorResult<()> {
        let dir = path.parent().ok_or(EditorError::SettingsPath)?;
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)?;
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.persist(path).map_err(|e| EditorError::Io(e.error))?;

        debug!(path = %path.display(), "Saved editor settings");
        Ok(())
    }
}
