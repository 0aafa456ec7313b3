//! Edit commits: drag tracking, geometry replacement and index pruning.

use crate::helpers::{TestLayerBuilder, add_drawn_feature, point, pos, rectangle, session_with, unit_square};
use geoedit::{
    BasicTool, EditEvent, EditMode, EditType, FeatureCollection, GeometryTool, MoveSelection, Session,
};

fn editable_session() -> Session {
    let mut session = session_with(vec![
        TestLayerBuilder::new("a")
            .with_point(0.0, 0.0)
            .with_point(1.0, 0.0)
            .with_point(2.0, 0.0)
            .build(),
        TestLayerBuilder::new("b").with_point(5.0, 5.0).with_point(6.0, 6.0).build(),
    ]);
    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::Modify);
    session
}

fn points(n: usize) -> FeatureCollection {
    FeatureCollection::new((0..n).map(|i| point(i as f64, 1.0)).collect())
}

// ============================================================================
// Drag tracking
// ============================================================================

#[test]
fn test_move_position_tracks_distance() {
    let mut session = editable_session();

    session.handle_edit(&EditEvent::new(EditType::MovePosition).with_position(pos(0.0, 0.0)));
    assert_eq!(session.editing().drag().start, Some(pos(0.0, 0.0)));
    assert_eq!(session.editing().drag().distance_m, Some(0.0));

    // One degree of latitude is about 111.2 km
    session.handle_edit(&EditEvent::new(EditType::MovePosition).with_position(pos(0.0, 1.0)));
    let distance = session.editing().drag().distance_m.unwrap();
    assert!((distance - 111_195.0).abs() < 10.0, "distance was {distance}");
    // The start stays fixed for the whole gesture
    assert_eq!(session.editing().drag().start, Some(pos(0.0, 0.0)));

    session.handle_edit(&EditEvent::new(EditType::FinishMovePosition));
    assert!(!session.editing().drag().is_tracking());
    assert_eq!(session.editing().drag().distance_m, None);
}

#[test]
fn test_move_position_without_coordinate_leaves_tracker() {
    let mut session = editable_session();
    session.handle_edit(&EditEvent::new(EditType::MovePosition));
    assert!(!session.editing().drag().is_tracking());
}

// ============================================================================
// Geometry replacement
// ============================================================================

#[test]
fn test_commit_replaces_features_and_bumps_counter() {
    let mut session = editable_session();
    let before = session.editing().update_counter();

    let outcome = session.handle_edit(&EditEvent::new(EditType::AddFeature).with_data(points(4)));
    assert!(outcome.geometry_changed);
    assert_eq!(session.editing().update_counter(), before + 1);
    assert_eq!(session.layers().get(&"a".into()).unwrap().feature_count(), 4);
    // Other layers are untouched
    assert_eq!(session.layers().get(&"b".into()).unwrap().feature_count(), 2);
}

#[test]
fn test_tentative_edits_do_not_replace_geometry() {
    let mut session = editable_session();
    let before = session.editing().update_counter();

    for edit_type in [
        EditType::AddTentativePosition,
        EditType::UpdateTentativeFeature,
        EditType::Translating,
        EditType::CancelFeature,
    ] {
        let outcome = session.handle_edit(&EditEvent::new(edit_type).with_data(points(1)));
        assert!(!outcome.geometry_changed, "{edit_type:?} replaced geometry");
    }
    assert_eq!(session.editing().update_counter(), before);
    assert_eq!(session.layers().get(&"a".into()).unwrap().feature_count(), 3);
}

#[test]
fn test_commit_without_editable_layer_is_ignored() {
    let mut session = session_with(vec![TestLayerBuilder::new("a").with_point(0.0, 0.0).build()]);
    session.set_edit_mode(EditMode::Modify);

    let outcome = session.handle_edit(&EditEvent::new(EditType::Edit).with_data(points(5)));
    assert!(!outcome.geometry_changed);
    assert_eq!(session.editing().update_counter(), 0);
    assert_eq!(session.layers().get(&"a".into()).unwrap().feature_count(), 1);
}

#[test]
fn test_commit_for_unknown_editable_layer_is_ignored() {
    let mut session = editable_session();
    session.set_editable_layer(Some("missing".into()));

    let outcome = session.handle_edit(&EditEvent::new(EditType::Edit).with_data(points(5)));
    assert!(!outcome.geometry_changed);
    assert_eq!(session.editing().update_counter(), 0);
}

// ============================================================================
// Selection updates
// ============================================================================

#[test]
fn test_context_selection_replaces_edit_selection() {
    let mut session = editable_session();
    session.handle_edit(&EditEvent::new(EditType::Select).with_context_selection(vec![2, 0]));
    assert_eq!(session.editing().edit_selection(), &[0, 2]);

    // Deselect without context indexes empties the selection
    session.handle_edit(&EditEvent::new(EditType::Deselect));
    assert!(session.editing().edit_selection().is_empty());
}

#[test]
fn test_top_level_indexes_back_up_missing_context() {
    let mut session = editable_session();
    let mut event = EditEvent::new(EditType::Select);
    event.selected_feature_indexes = vec![1];
    session.handle_edit(&event);
    assert_eq!(session.editing().edit_selection(), &[1]);

    // The context wins when both are present
    let mut event = EditEvent::new(EditType::Select).with_context_selection(vec![2]);
    event.selected_feature_indexes = vec![0];
    session.handle_edit(&event);
    assert_eq!(session.editing().edit_selection(), &[2]);
}

#[test]
fn test_selection_change_clears_extrude_points() {
    let mut session = session_with(vec![TestLayerBuilder::new("a").with_feature(unit_square()).build()]);
    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::ExtrudeSelect);
    session.handle_edit(&EditEvent::new(EditType::Select).with_context_selection(vec![0]));
    session.set_active_tool(Some(GeometryTool::Extrude));
    session.handle_click(&geoedit::ClickEvent::miss().at(pos(0.0, 0.0)));
    assert_eq!(session.drawing().extrude_points(), &[0]);

    session.handle_edit(&EditEvent::new(EditType::Deselect));
    assert!(session.drawing().extrude_points().is_empty());
}

#[test]
fn test_shrinking_layer_prunes_stale_indexes() {
    let mut session = editable_session();
    session.handle_edit(&EditEvent::new(EditType::Select).with_context_selection(vec![0, 2]));

    let outcome = session.handle_edit(&EditEvent::new(EditType::RemoveFeature).with_data(points(2)));
    assert!(outcome.geometry_changed);
    assert_eq!(session.editing().edit_selection(), &[0]);
}

#[test]
fn test_pruning_move_selection_to_empty_drops_target() {
    let mut session = editable_session();
    session.set_move_selection(MoveSelection::new("a", vec![2]));

    session.handle_edit(&EditEvent::new(EditType::RemoveFeature).with_data(points(1)));
    assert_eq!(session.editing().move_selection(), &MoveSelection::empty());
}

// ============================================================================
// Basic move
// ============================================================================

#[test]
fn test_basic_move_without_target_is_dropped() {
    let mut session = editable_session();
    session.set_edit_mode(EditMode::View);
    session.set_basic_tool(BasicTool::Move);

    let event = EditEvent::new(EditType::Translated).with_data(points(3));
    assert!(!session.handle_basic_move_edit(&event));
    assert_eq!(session.editing().update_counter(), 0);
}

#[test]
fn test_basic_move_applies_to_target_layer() {
    let mut session = editable_session();
    session.set_edit_mode(EditMode::View);
    session.set_basic_tool(BasicTool::Move);
    session.set_move_selection(MoveSelection::new("b", vec![0, 1]));

    let moved = FeatureCollection::new(vec![point(7.0, 7.0), point(8.0, 8.0)]);
    assert!(session.handle_basic_move_edit(&EditEvent::new(EditType::Translated).with_data(moved.clone())));
    assert_eq!(session.layers().get(&"b".into()).unwrap().features, moved);
    assert_eq!(session.editing().update_counter(), 1);
    // The editable layer is not involved
    assert_eq!(session.layers().get(&"a".into()).unwrap().feature_count(), 3);
}

#[test]
fn test_basic_move_ignores_other_edit_types() {
    let mut session = editable_session();
    session.set_move_selection(MoveSelection::new("b", vec![0]));
    let event = EditEvent::new(EditType::AddFeature).with_data(points(1));
    assert!(!session.handle_basic_move_edit(&event));
    assert_eq!(session.layers().get(&"b".into()).unwrap().feature_count(), 2);
}

// ============================================================================
// Routing with the area tool chosen outside view mode
// ============================================================================

#[test]
fn test_area_tool_outside_view_mode_opens_no_session() {
    let mut session = editable_session();
    session.set_basic_tool(BasicTool::SelectByArea);
    assert!(!session.drawing().is_selecting_by_area());
    assert!(session.drawing().session().is_none());

    // Returning to view opens it
    session.set_edit_mode(EditMode::View);
    assert!(session.drawing().is_selecting_by_area());
}

#[test]
fn test_structural_commits_reach_layer_with_area_tool_set() {
    let mut session = editable_session();
    session.set_basic_tool(BasicTool::SelectByArea);

    let moved = FeatureCollection::new(vec![point(0.5, 0.5), point(1.0, 0.0), point(2.0, 0.0)]);
    let outcome = session.handle_edit(&EditEvent::new(EditType::MovePosition).with_data(moved.clone()));
    assert!(outcome.geometry_changed);
    assert_eq!(session.layers().get(&"a".into()).unwrap().features, moved);

    let translated = FeatureCollection::new(vec![point(3.0, 3.0), point(4.0, 3.0), point(5.0, 3.0)]);
    let outcome = session.handle_edit(&EditEvent::new(EditType::Translated).with_data(translated.clone()));
    assert!(outcome.geometry_changed);
    assert_eq!(session.layers().get(&"a".into()).unwrap().features, translated);
    assert_eq!(session.editing().update_counter(), 2);
}

#[test]
fn test_drawn_polygon_outside_view_mode_is_a_regular_add() {
    let mut session = editable_session();
    session.set_basic_tool(BasicTool::SelectByArea);

    let outcome = session.handle_edit(&add_drawn_feature(rectangle(-1.0, -1.0, 1.0, 1.0)));
    assert!(outcome.geometry_changed);
    assert_eq!(outcome.deferred, None);
    assert_eq!(session.editing().basic_tool(), BasicTool::SelectByArea);
    assert!(session.editing().move_selection().is_empty());
    assert_eq!(session.layers().get(&"a".into()).unwrap().feature_count(), 1);
}
