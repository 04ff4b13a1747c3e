//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only, which keeps the reducer pure:
//! it mutates state and returns effects, never performs I/O itself.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch the thread list.
    LoadThreads,

    /// Fetch one thread's messages.
    LoadMessages { thread_id: String },

    /// Create a new empty thread.
    CreateThread,

    /// Rename a thread. The title is already validated as non-empty.
    RenameThread { thread_id: String, title: String },

    /// Delete a thread.
    DeleteThread { thread_id: String },

    /// Send a question through the atomic ask flow. `seq` is echoed in the
    /// completion event so stale results can be dropped.
    Ask {
        seq: u64,
        thread_id: Option<String>,
        question: String,
    },

    /// Send a question through the streaming ask flow.
    StartStream { question: String },
}
