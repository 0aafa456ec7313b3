//! Editing and drawing state stores.
//!
//! Two explicit state structs replace ambient process-wide stores. Neither
//! validates cross-field consistency: the dispatcher in [`crate::input`] and
//! the [`crate::session::Session`] keep the invariants between them.

mod drawing;
mod editing;

pub use drawing::{DrawingKind, DrawingModeHandle, DrawingModeKind, DrawingState, SelectedFeature};
pub use editing::{DragTracker, EditingState, InspectedFeature, MoveSelection};

/// Normalize into an ordered set: ascending, no duplicates.
pub(crate) fn ordered_set(mut indexes: Vec<usize>) -> Vec<usize> {
    indexes.sort_unstable();
    indexes.dedup();
    indexes
}

/// Flip membership of `index` in an ordered set, keeping it ordered.
/// Returns true when the index is present afterwards.
pub(crate) fn toggle_in_ordered_set(set: &mut Vec<usize>, index: usize) -> bool {
    match set.binary_search(&index) {
        Ok(position) => {
            set.remove(position);
            false
        }
        Err(position) => {
            set.insert(position, index);
            true
        }
    }
}
