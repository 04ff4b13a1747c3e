//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! the tick that drives animations and the paced writer, and results of
//! async backend calls delivered through the runtime's inbox.

use crossterm::event::Event as TerminalEvent;
use tokio::sync::mpsc;

use dbchat_api::{ApiError, AskResponse, Message, ThreadSummary};

/// One event of a streamed answer, sent by the stream task.
///
/// Chunks are already sentinel-stripped; the reducer only has to feed them
/// to the paced writer.
#[derive(Debug)]
pub enum StreamEvent {
    /// Displayable text.
    Chunk(String),
    /// Stream ended normally.
    Done,
    /// Stream failed, either up front or mid-body.
    Failed(ApiError),
}

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick: drives the writer drain and the typing animation.
    Tick,

    /// Raw terminal input.
    Terminal(TerminalEvent),

    /// A stream request was accepted; chunks will arrive on `rx`.
    StreamStarted { rx: mpsc::UnboundedReceiver<StreamEvent> },

    /// One event from the active stream.
    Stream(StreamEvent),

    /// Result of `GET /dbchat/threads`.
    ThreadsLoaded(Result<Vec<ThreadSummary>, ApiError>),

    /// Result of loading one thread's messages.
    MessagesLoaded {
        thread_id: String,
        result: Result<Vec<Message>, ApiError>,
    },

    /// Result of creating a thread; carries the new id.
    ThreadCreated(Result<String, ApiError>),

    /// Result of a rename.
    ThreadRenamed {
        thread_id: String,
        title: String,
        result: Result<(), ApiError>,
    },

    /// Result of a delete.
    ThreadDeleted {
        thread_id: String,
        result: Result<(), ApiError>,
    },

    /// Result of the atomic ask flow. `seq` identifies which submitted
    /// question this answers; results from cancelled questions are stale
    /// and get dropped by the reducer.
    AskCompleted {
        seq: u64,
        result: Result<AskResponse, ApiError>,
    },
}
