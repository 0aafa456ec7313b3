//! Geometry utilities - bounding boxes, rectangle containment, distances.
//!
//! Everything here is a pure function. All tests are planar in degree space
//! except [`haversine_distance`], which is the only geodesic measure.

use crate::constants::EARTH_RADIUS_M;
use crate::types::{BoundingBox, Feature, FeatureCollection, Geometry, Position};
use serde_json::Value;

// ============================================================================
// Bounding Boxes
// ============================================================================

/// Bounding box of an arbitrary GeoJSON-style value.
///
/// Arrays whose first element is a number are treated as `[lon, lat, ..]`
/// leaves; any other array is descended into. Objects are descended through
/// their `features`, `geometry`, `geometries` and `coordinates` members, so
/// a raw coordinate tree, a geometry, a feature and a feature collection all
/// work. Returns `None` when no valid leaf was found.
pub fn bounding_box_of_value(value: &Value) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    accumulate_value(value, &mut bounds);
    bounds
}

fn accumulate_value(value: &Value, bounds: &mut Option<BoundingBox>) {
    match value {
        Value::Array(items) => {
            if items.first().is_some_and(Value::is_number) {
                if let (Some(lon), Some(lat)) = (
                    items.first().and_then(Value::as_f64),
                    items.get(1).and_then(Value::as_f64),
                ) {
                    include(bounds, Position::new(lon, lat));
                }
                return;
            }
            for item in items {
                accumulate_value(item, bounds);
            }
        }
        Value::Object(map) => {
            for key in ["features", "geometry", "geometries", "coordinates"] {
                if let Some(child) = map.get(key) {
                    accumulate_value(child, bounds);
                }
            }
        }
        _ => {}
    }
}

#[inline]
fn include(bounds: &mut Option<BoundingBox>, position: Position) {
    match bounds {
        Some(b) => b.extend(position),
        None => {
            *bounds = Some(BoundingBox::new(
                position.lon(),
                position.lat(),
                position.lon(),
                position.lat(),
            ))
        }
    }
}

/// Every coordinate of a geometry, holes and all components included
pub fn positions(geometry: &Geometry) -> Box<dyn Iterator<Item = Position> + '_> {
    match geometry {
        Geometry::Point(p) => Box::new(std::iter::once(*p)),
        Geometry::MultiPoint(points) | Geometry::LineString(points) => Box::new(points.iter().copied()),
        Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
            Box::new(lines.iter().flatten().copied())
        }
        Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten().flatten().copied()),
    }
}

/// Planar min/max over every coordinate of a geometry
pub fn geometry_bounds(geometry: &Geometry) -> Option<BoundingBox> {
    let mut bounds = None;
    for position in positions(geometry) {
        include(&mut bounds, position);
    }
    bounds
}

/// Bounds of a feature; `None` when it has no geometry or no coordinates
pub fn feature_bounds(feature: &Feature) -> Option<BoundingBox> {
    feature.geometry.as_ref().and_then(geometry_bounds)
}

/// Union of the bounds of every feature in a collection
pub fn collection_bounds(collection: &FeatureCollection) -> Option<BoundingBox> {
    let mut bounds = None;
    for feature in &collection.features {
        if let Some(geometry) = &feature.geometry {
            for position in positions(geometry) {
                include(&mut bounds, position);
            }
        }
    }
    bounds
}

/// Closed rectangle polygon with corners `[w,n],[e,n],[e,s],[w,s],[w,n]`
pub fn rectangle_polygon(bounds: &BoundingBox) -> Geometry {
    let BoundingBox {
        west,
        south,
        east,
        north,
    } = *bounds;
    Geometry::Polygon(vec![vec![
        Position::new(west, north),
        Position::new(east, north),
        Position::new(east, south),
        Position::new(west, south),
        Position::new(west, north),
    ]])
}

// ============================================================================
// Containment
// ============================================================================

/// Coarse "touches the rectangle" test for a feature.
///
/// Point: the coordinate is inside. LineString / MultiPoint: any coordinate
/// is inside. Polygon: any coordinate of the outer ring is inside (holes are
/// ignored). Multi geometries: any component matches its single rule.
/// A feature without geometry is never inside. This is not an exact
/// intersection test: a rectangle lying strictly within a polygon without
/// containing any of its vertices does not match.
pub fn feature_within_bounds(feature: &Feature, bounds: &BoundingBox) -> bool {
    feature
        .geometry
        .as_ref()
        .is_some_and(|geometry| geometry_within_bounds(geometry, bounds))
}

pub fn geometry_within_bounds(geometry: &Geometry, bounds: &BoundingBox) -> bool {
    match geometry {
        Geometry::Point(p) => bounds.contains(*p),
        Geometry::LineString(points) | Geometry::MultiPoint(points) => any_inside(points, bounds),
        Geometry::Polygon(rings) => polygon_touches(rings, bounds),
        Geometry::MultiLineString(lines) => lines.iter().any(|line| any_inside(line, bounds)),
        Geometry::MultiPolygon(polygons) => polygons.iter().any(|rings| polygon_touches(rings, bounds)),
    }
}

#[inline]
fn any_inside(points: &[Position], bounds: &BoundingBox) -> bool {
    points.iter().any(|p| bounds.contains(*p))
}

#[inline]
fn polygon_touches(rings: &[Vec<Position>], bounds: &BoundingBox) -> bool {
    rings.first().is_some_and(|outer| any_inside(outer, bounds))
}

// ============================================================================
// Distances
// ============================================================================

/// Great-circle distance in meters (haversine, R = 6,371,000 m)
pub fn haversine_distance(a: Position, b: Position) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let d_phi = (b.lat() - a.lat()).to_radians();
    let d_lambda = (b.lon() - a.lon()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Euclidean distance in degree space
#[inline]
pub fn planar_distance(a: Position, b: Position) -> f64 {
    (a.lon() - b.lon()).hypot(a.lat() - b.lat())
}

/// Index and distance of the vertex closest to `target`
pub fn nearest_vertex(vertices: &[Position], target: Position) -> Option<(usize, f64)> {
    vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| (index, planar_distance(*vertex, target)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
