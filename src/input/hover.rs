//! Hover handling and the cursor table.

use super::events::HoverEvent;
use crate::state::EditingState;
use crate::types::{BasicTool, Cursor, EditMode};

/// Cursor for a mode pair and hit/miss. Total over every combination.
///
/// ```text
/// view   + view          pointer
/// view   + select        pointer
/// view   + selectByArea  crosshair
/// view   + move          grab / auto
/// modify                 move / auto
/// transform family       grab / auto
/// anything else          pointer / crosshair
/// ```
pub fn cursor_for(mode: EditMode, tool: BasicTool, hit: bool) -> Cursor {
    match (mode, tool) {
        (EditMode::View, BasicTool::View | BasicTool::Select) => Cursor::Pointer,
        (EditMode::View, BasicTool::SelectByArea) => Cursor::Crosshair,
        (EditMode::View, BasicTool::Move) => on_hit(hit, Cursor::Grab, Cursor::Auto),
        (EditMode::Modify, _) => on_hit(hit, Cursor::Move, Cursor::Auto),
        (mode, _) if mode.is_transform_family() => on_hit(hit, Cursor::Grab, Cursor::Auto),
        _ => on_hit(hit, Cursor::Pointer, Cursor::Crosshair),
    }
}

#[inline]
fn on_hit(hit: bool, yes: Cursor, no: Cursor) -> Cursor {
    if hit { yes } else { no }
}

/// Record the hovered feature and derive the cursor.
pub fn handle_hover(event: &HoverEvent, editing: &mut EditingState) -> Cursor {
    let cursor = cursor_for(editing.edit_mode(), editing.basic_tool(), event.is_hit());
    editing.set_hovered(event.object.clone());
    cursor
}
