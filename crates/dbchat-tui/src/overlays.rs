//! Modal overlays.
//!
//! Overlays are stored separately from `TuiState` (see `state.rs`) so the
//! reducer can hold `&mut Overlay` and `&mut TuiState` at once.

use crate::input::InputState;

/// The active modal, if any.
#[derive(Debug)]
pub enum Overlay {
    /// Edit a thread's title.
    Rename {
        thread_id: String,
        input: InputState,
        /// Validation message shown inside the overlay.
        error: Option<String>,
    },
    /// Ask before deleting a thread.
    ConfirmDelete { thread_id: String, title: String },
}

impl Overlay {
    /// Builds the rename overlay pre-filled with the current title.
    pub fn rename(thread_id: &str, current_title: &str) -> Self {
        let mut input = InputState::new();
        for c in current_title.chars() {
            input.insert(c);
        }
        Overlay::Rename {
            thread_id: thread_id.to_string(),
            input,
            error: None,
        }
    }

    pub fn confirm_delete(thread_id: &str, title: &str) -> Self {
        Overlay::ConfirmDelete {
            thread_id: thread_id.to_string(),
            title: title.to_string(),
        }
    }
}
