//! Fit-to-bounds view derivation.
//!
//! Turns a bounding box into the center and Web Mercator zoom level the map
//! camera should move to. Empty data yields `None` so callers can skip the
//! zoom step entirely.

use crate::constants::{MAX_MERCATOR_LAT, MIN_FIT_ZOOM, TILE_SIZE_PX};
use crate::geometry::collection_bounds;
use crate::types::{BoundingBox, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Size of the map canvas in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Camera target derived from data bounds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTarget {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

/// Normalized Mercator x in `[0, 1]`
#[inline]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Mercator y in `[0, 1]`, growing southwards
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let phi = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    (1.0 - (PI / 4.0 + phi / 2.0).tan().ln() / PI) / 2.0
}

#[inline]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

/// Center and zoom that fit `bounds` into `viewport` with `padding` pixels
/// on every side. Degenerate (zero-area) bounds are centered at `max_zoom`.
pub fn fit_bounds(bounds: &BoundingBox, viewport: Viewport, padding: f64, max_zoom: f64) -> Option<ViewTarget> {
    if !bounds.to_array().iter().all(|v| v.is_finite()) {
        return None;
    }

    let x_west = mercator_x(bounds.west);
    let x_east = mercator_x(bounds.east);
    let y_north = mercator_y(bounds.north);
    let y_south = mercator_y(bounds.south);

    let longitude = (bounds.west + bounds.east) / 2.0;
    let latitude = inverse_mercator_y((y_north + y_south) / 2.0);

    let span_x = (x_east - x_west).abs();
    let span_y = (y_south - y_north).abs();

    let available_w = if viewport.width > 2.0 * padding { viewport.width - 2.0 * padding } else { viewport.width };
    let available_h = if viewport.height > 2.0 * padding { viewport.height - 2.0 * padding } else { viewport.height };

    let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
        max_zoom
    } else {
        let scale_x = if span_x > f64::EPSILON { available_w / (span_x * TILE_SIZE_PX) } else { f64::INFINITY };
        let scale_y = if span_y > f64::EPSILON { available_h / (span_y * TILE_SIZE_PX) } else { f64::INFINITY };
        scale_x.min(scale_y).log2().clamp(MIN_FIT_ZOOM, max_zoom)
    };

    Some(ViewTarget {
        longitude,
        latitude,
        zoom,
    })
}

/// [`fit_bounds`] over every feature of a collection
pub fn fit_collection(
    collection: &FeatureCollection,
    viewport: Viewport,
    padding: f64,
    max_zoom: f64,
) -> Option<ViewTarget> {
    collection_bounds(collection).and_then(|bounds| fit_bounds(&bounds, viewport, padding, max_zoom))
}
