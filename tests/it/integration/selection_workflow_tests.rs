//! Click selection workflows: inspection, move selection, edit selection.

use crate::helpers::{TestLayerBuilder, point, session_with};
use geoedit::{BasicTool, ClickEvent, ClickRule, EditMode, MoveSelection, Session};

fn two_layers() -> Session {
    session_with(vec![
        TestLayerBuilder::new("a")
            .with_point(0.0, 0.0)
            .with_point(1.0, 0.0)
            .with_point(2.0, 0.0)
            .build(),
        TestLayerBuilder::new("b").with_point(5.0, 5.0).build(),
    ])
}

fn click(layer: &str, index: usize) -> ClickEvent {
    ClickEvent::hit(layer, index, point(index as f64, 0.0))
}

// ============================================================================
// Inspection (view + view)
// ============================================================================

#[test]
fn test_view_click_inspects_single_feature() {
    let mut session = two_layers();
    assert_eq!(session.handle_click(&click("a", 1)), ClickRule::Inspect);
    let inspected = session.editing().inspected().expect("inspected");
    assert_eq!(inspected.index, Some(1));

    session.handle_click(&click("b", 0));
    assert_eq!(session.editing().inspected().and_then(|i| i.layer_id.clone()), Some("b".into()));

    session.handle_click(&ClickEvent::miss());
    assert!(session.editing().inspected().is_none());
}

// ============================================================================
// Move selection (view + select)
// ============================================================================

#[test]
fn test_click_to_deselect_is_idempotent() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    let before = session.editing().move_selection().clone();

    session.handle_click(&click("a", 1));
    assert_eq!(session.editing().move_selection(), &MoveSelection::new("a", vec![1]));

    session.handle_click(&click("a", 1));
    assert_eq!(session.editing().move_selection(), &before);
    assert_eq!(session.editing().move_selection(), &MoveSelection::empty());
}

#[test]
fn test_shift_toggle_symmetry() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    session.set_move_selection(MoveSelection::new("a", vec![0, 2]));

    session.handle_click(&click("a", 0).with_shift());
    session.handle_click(&click("a", 0).with_shift());

    assert_eq!(session.editing().move_selection(), &MoveSelection::new("a", vec![0, 2]));
}

/// Known quirk, reproduced on purpose: shift-removing down to a single
/// remaining index drops the layer target while keeping the index.
#[test]
fn test_shift_remove_to_singleton_drops_layer_target() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    session.set_move_selection(MoveSelection::new("a", vec![0, 2]));

    session.handle_click(&click("a", 0).with_shift());
    let selection = session.editing().move_selection();
    assert_eq!(selection.layer_id, None);
    assert_eq!(selection.indexes, vec![2]);

    // Shift-removing from three keeps the target
    session.set_move_selection(MoveSelection::new("a", vec![0, 1, 2]));
    session.handle_click(&click("a", 1).with_shift());
    assert_eq!(session.editing().move_selection(), &MoveSelection::new("a", vec![0, 2]));
}

#[test]
fn test_click_on_other_layer_replaces_selection() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    session.handle_click(&click("a", 0));
    session.handle_click(&click("a", 2).with_shift());
    assert_eq!(session.editing().move_selection().len(), 2);

    session.handle_click(&click("b", 0));
    assert_eq!(session.editing().move_selection(), &MoveSelection::new("b", vec![0]));
}

#[test]
fn test_miss_clears_move_selection() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    session.handle_click(&click("a", 0));
    session.handle_click(&ClickEvent::miss().with_shift());
    assert_eq!(session.editing().move_selection(), &MoveSelection::empty());
}

#[test]
fn test_area_tool_ignores_clicks() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::SelectByArea);
    assert_eq!(session.handle_click(&click("a", 0)), ClickRule::IgnoreWhileSelectingByArea);
    assert!(session.editing().move_selection().is_empty());
    assert!(session.editing().inspected().is_none());
}

// ============================================================================
// Edit selection (select mode)
// ============================================================================

#[test]
fn test_edit_selection_toggles_on_editable_layer() {
    let mut session = two_layers();
    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::Select);

    session.handle_click(&click("a", 2));
    session.handle_click(&click("a", 0).with_shift());
    assert_eq!(session.editing().edit_selection(), &[0, 2]);

    // A hit on another layer counts as a miss
    session.handle_click(&click("b", 0));
    assert!(session.editing().edit_selection().is_empty());
}

#[test]
fn test_mode_change_clears_edit_selection() {
    let mut session = two_layers();
    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::Modify);

    assert_eq!(session.handle_click(&click("a", 1)), ClickRule::SelectForEdit);
    assert_eq!(session.editing().edit_selection(), &[1]);

    session.set_edit_mode(EditMode::Translate);
    assert!(session.editing().edit_selection().is_empty());
}

#[test]
fn test_editable_layer_change_clears_edit_selection() {
    let mut session = two_layers();
    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::Modify);
    session.handle_click(&click("a", 1));

    session.set_editable_layer(Some("b".into()));
    assert!(session.editing().edit_selection().is_empty());
}

#[test]
fn test_edit_and_move_selection_are_independent() {
    let mut session = two_layers();
    session.set_basic_tool(BasicTool::Select);
    session.handle_click(&click("b", 0));

    session.set_editable_layer(Some("a".into()));
    session.set_edit_mode(EditMode::Select);
    session.handle_click(&click("a", 1));

    assert_eq!(session.editing().edit_selection(), &[1]);
    assert_eq!(session.editing().move_selection(), &MoveSelection::new("b", vec![0]));
}
