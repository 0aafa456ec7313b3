//! Pointer event dispatch.
//!
//! Every handler here is a plain function over the state stores it is
//! given; none of them keeps state of its own. The [`crate::session::Session`]
//! owns the stores and routes engine events to these functions.
//!
//! ## Modules
//!
//! - `events` - Click, hover and edit-commit payloads
//! - `click` - Ordered click rules and the multi-select toggle
//! - `hover` - Cursor table
//! - `commit` - Edit commits against the editable or move-target layer
//! - `drawing` - Rectangle completion for drawing sessions

pub mod click;
pub mod commit;
pub mod drawing;
pub mod events;
pub mod hover;

pub use click::{CLICK_RULES, ClickContext, ClickRule, handle_click, matching_rule, toggle_selection};
pub use commit::{handle_basic_move_commit, handle_edit_commit};
pub use drawing::{DeferredStep, handle_drawing_edit, select_by_area};
pub use events::{ClickEvent, EditContext, EditEvent, EditType, HoverEvent};
pub use hover::{cursor_for, handle_hover};
