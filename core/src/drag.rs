//! Drag-and-drop state for reordering the list.
//!
//! The host forwards `dragstart`, `dragenter`, `drop` and `dragend` events;
//! this module only tracks which row is being dragged, which row is under the
//! pointer, and performs the splice when the drop lands.

use crate::types::TodoId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragging: Option<TodoId>,
    pub over: Option<TodoId>,
}

impl DragState {
    pub fn start(&mut self, id: TodoId) {
        self.dragging = Some(id);
        self.over = None;
    }

    pub fn enter(&mut self, id: TodoId) {
        if self.dragging.is_some() {
            self.over = Some(id);
        }
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.dragging.is_some()
    }
}

/// Moves the element at `from` so that it ends up at index `to`, shifting the
/// elements in between. Returns `false` and leaves `items` untouched when
/// either index is out of bounds or they are equal.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
