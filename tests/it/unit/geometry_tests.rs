//! Geometry utility tests: bounds, containment, distance.

use crate::helpers::{point, polygon, pos, rectangle};
use geoedit::geometry::{
    bounding_box_of_value, feature_bounds, feature_within_bounds, haversine_distance, rectangle_polygon,
};
use geoedit::{BoundingBox, Feature, Geometry};
use serde_json::json;

// ============================================================================
// Bounding boxes
// ============================================================================

#[test]
fn test_rectangle_polygon_bounds_round_trip() {
    for (w, s, e, n) in [(-1.0, -1.0, 1.0, 1.0), (10.5, -40.25, 12.0, -39.0), (-180.0, -85.0, 180.0, 85.0)] {
        let bounds = BoundingBox::new(w, s, e, n);
        let polygon = rectangle_polygon(&bounds);
        let value = serde_json::to_value(&polygon).unwrap();
        assert_eq!(bounding_box_of_value(&value), Some(bounds));
        assert_eq!(feature_bounds(&Feature::new(polygon)), Some(bounds));
    }
}

#[test]
fn test_rectangle_polygon_corner_order() {
    let Geometry::Polygon(rings) = rectangle_polygon(&BoundingBox::new(0.0, 1.0, 2.0, 3.0)) else {
        panic!("expected polygon");
    };
    assert_eq!(rings[0], vec![pos(0.0, 3.0), pos(2.0, 3.0), pos(2.0, 1.0), pos(0.0, 1.0), pos(0.0, 3.0)]);
}

#[test]
fn test_bounds_of_raw_coordinate_tree() {
    let value = json!([[[-1.0, 1.0], [1.0, 1.0], [1.0, -1.0], [-1.0, -1.0], [-1.0, 1.0]]]);
    assert_eq!(bounding_box_of_value(&value), Some(BoundingBox::new(-1.0, -1.0, 1.0, 1.0)));
}

#[test]
fn test_feature_without_geometry_has_no_bounds() {
    assert!(feature_bounds(&Feature::default()).is_none());
    assert!(feature_bounds(&Feature::new(Geometry::LineString(vec![]))).is_none());
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_point_containment_matches_inclusive_rule() {
    let bounds = BoundingBox::new(-2.0, -1.0, 3.0, 4.0);
    let samples = [-3.0, -2.0, -1.0, 0.0, 2.5, 3.0, 4.0, 4.5];
    for &lng in &samples {
        for &lat in &samples {
            let expected = (-2.0..=3.0).contains(&lng) && (-1.0..=4.0).contains(&lat);
            assert_eq!(
                feature_within_bounds(&point(lng, lat), &bounds),
                expected,
                "point ({lng}, {lat})"
            );
        }
    }
}

#[test]
fn test_line_matches_when_any_vertex_inside() {
    let line = Feature::new(Geometry::LineString(vec![pos(-5.0, 0.0), pos(0.5, 0.5), pos(5.0, 0.0)]));
    assert!(feature_within_bounds(&line, &BoundingBox::new(0.0, 0.0, 1.0, 1.0)));

    // Crossing the rectangle without a vertex inside does not count
    let crossing = Feature::new(Geometry::LineString(vec![pos(-5.0, 0.5), pos(5.0, 0.5)]));
    assert!(!feature_within_bounds(&crossing, &BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
}

#[test]
fn test_polygon_ignores_holes() {
    let outer = vec![pos(0.0, 0.0), pos(10.0, 0.0), pos(10.0, 10.0), pos(0.0, 10.0), pos(0.0, 0.0)];
    let hole = vec![pos(4.0, 4.0), pos(6.0, 4.0), pos(6.0, 6.0), pos(4.0, 6.0), pos(4.0, 4.0)];
    let with_hole = Feature::new(Geometry::Polygon(vec![outer, hole]));

    // Only the hole's vertices fall inside
    assert!(!feature_within_bounds(&with_hole, &BoundingBox::new(3.0, 3.0, 7.0, 7.0)));
    assert!(feature_within_bounds(&with_hole, &BoundingBox::new(-1.0, -1.0, 1.0, 1.0)));
}

#[test]
fn test_multi_geometries_match_any_component() {
    let far = rectangle(50.0, 50.0, 51.0, 51.0);
    let near = polygon(&[[0.0, 0.0], [0.5, 0.0], [0.5, 0.5], [0.0, 0.0]]);
    let (Some(Geometry::Polygon(far)), Some(Geometry::Polygon(near))) = (far.geometry, near.geometry) else {
        panic!("expected polygons");
    };
    let multi = Feature::new(Geometry::MultiPolygon(vec![far, near]));
    assert!(feature_within_bounds(&multi, &BoundingBox::new(-1.0, -1.0, 1.0, 1.0)));
    assert!(!feature_within_bounds(&multi, &BoundingBox::new(20.0, 20.0, 30.0, 30.0)));
}

#[test]
fn test_missing_geometry_is_not_in_bounds() {
    assert!(!feature_within_bounds(&Feature::default(), &BoundingBox::new(-180.0, -90.0, 180.0, 90.0)));
}

// ============================================================================
// Distances
// ============================================================================

#[test]
fn test_distance_to_self_is_zero() {
    for p in [pos(0.0, 0.0), pos(13.4, 52.5), pos(-179.9, -89.0)] {
        assert_eq!(haversine_distance(p, p), 0.0);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let pairs = [(pos(0.0, 0.0), pos(1.0, 1.0)), (pos(-73.98, 40.75), pos(2.35, 48.85))];
    for (a, b) in pairs {
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }
}

#[test]
fn test_distance_grows_along_meridian() {
    let origin = pos(7.0, 0.0);
    let mut previous = 0.0;
    for step in 1..=18 {
        let d = haversine_distance(origin, pos(7.0, step as f64 * 5.0));
        assert!(d >= previous);
        previous = d;
    }
}

#[test]
fn test_one_degree_of_latitude() {
    // 2 * pi * 6_371_000 / 360
    let d = haversine_distance(pos(0.0, 0.0), pos(0.0, 1.0));
    assert!((d - 111_194.93).abs() < 0.1, "got {d}");
}

// ============================================================================
// Lenient GeoJSON input
// ============================================================================

#[test]
fn test_position_with_altitude_drops_extra_ordinates() {
    let event: geoedit::EditEvent = serde_json::from_value(json!({
        "editType": "addFeature",
        "updatedData": {
            "features": [{ "geometry": { "type": "Point", "coordinates": [12.5, 41.9, 35.0] } }]
        }
    }))
    .unwrap();
    let data = event.updated_data.unwrap();
    assert_eq!(data.features[0], point(12.5, 41.9));
}

#[test]
fn test_short_position_is_rejected() {
    assert!(serde_json::from_value::<geoedit::Position>(json!([1.0])).is_err());
}

#[test]
fn test_unreadable_geometry_keeps_feature() {
    let bounds = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
    for geometry in [
        json!({ "type": "Point" }),
        json!({ "type": "GeometryCollection", "geometries": [{ "type": "Point", "coordinates": [0.0, 0.0] }] }),
        json!({ "type": "Point", "coordinates": "nowhere" }),
        json!(null),
    ] {
        let feature: Feature =
            serde_json::from_value(json!({ "geometry": geometry, "properties": { "name": "kept" } })).unwrap();
        assert!(feature.geometry.is_none());
        assert_eq!(feature.label("name").as_deref(), Some("kept"));
        assert!(!feature_within_bounds(&feature, &bounds));
    }
}
