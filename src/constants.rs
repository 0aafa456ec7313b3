//! Crate-wide constants.
//!
//! Centralizes magic numbers, overlay identifiers and default styling so the
//! dispatcher and overlay code never carry bare literals.

// ============================================================================
// Geometry
// ============================================================================

/// Mean Earth radius used by the haversine distance, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum degree-space distance for a click to pick a polygon vertex
pub const VERTEX_PICK_THRESHOLD_DEG: f64 = 0.01;

// ============================================================================
// View Fitting
// ============================================================================

/// Tile size in pixels at zoom level 0 (Web Mercator)
pub const TILE_SIZE_PX: f64 = 512.0;

/// Padding in pixels kept around fitted bounds
pub const DEFAULT_FIT_PADDING_PX: f64 = 40.0;

/// Zoom used when fitting degenerate (single point) bounds
pub const DEFAULT_MAX_FIT_ZOOM: f64 = 16.0;

/// Lowest zoom a fit can produce
pub const MIN_FIT_ZOOM: f64 = 0.0;

/// Latitude limit of the Web Mercator projection
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

// ============================================================================
// Overlay Layer Ids
// ============================================================================

/// Live rectangle while a bounds-drawing session is open
pub const OVERLAY_DRAWING_BOUNDS: &str = "drawing-bounds";

/// Static visualization of a completed DrawnRectangle
pub const OVERLAY_DRAWN_BOUNDS: &str = "drawn-bounds";

/// Lasso rectangle while the select-by-area tool is active
pub const OVERLAY_SELECTION_RECTANGLE: &str = "selection-by-area";

/// Vertex markers chosen for an extrude operation
pub const OVERLAY_EXTRUDE_POINTS: &str = "extrude-points";

/// Features chosen for a geometry tool operation
pub const OVERLAY_GEOMETRY_TOOL_FEATURES: &str = "geometry-tool-features";

// ============================================================================
// Colors (RGBA)
// ============================================================================

/// Default fill color for newly created layers
pub const DEFAULT_LAYER_COLOR: [u8; 4] = [0, 128, 255, 160];

/// Drawn bounds outline
pub const DRAWN_BOUNDS_COLOR: [u8; 4] = [255, 140, 0, 200];

/// Selection rectangle outline
pub const SELECTION_RECTANGLE_COLOR: [u8; 4] = [0, 200, 120, 200];

/// Highlight for extrude vertices and geometry tool features
pub const HIGHLIGHT_COLOR: [u8; 4] = [255, 0, 128, 220];

// ============================================================================
// Settings
// ============================================================================

/// Directory under the platform config dir holding settings
pub const SETTINGS_DIR_NAME: &str = "geoedit";

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Log filter used when neither RUST_LOG nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "geoedit=info";
