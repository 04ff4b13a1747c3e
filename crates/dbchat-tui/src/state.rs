//! Application state composition.
//!
//! Top-level state hierarchy for the TUI:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── input: InputState        (question box)
//! │   ├── chat: ChatState          (transcript bubbles, scroll)
//! │   ├── threads: ThreadListState (sidebar, current thread)
//! │   └── ask: AskState            (idle, asking, waiting, streaming, draining)
//! └── overlay: Option<Overlay>     (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can take `&mut Overlay` and `&mut TuiState` simultaneously.

use tokio::sync::mpsc;

use dbchat_core::config::Config;

use crate::chat::ChatState;
use crate::events::StreamEvent;
use crate::input::InputState;
use crate::overlays::Overlay;
use crate::threads::ThreadListState;
use crate::writer::PacedWriter;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlay: None,
        }
    }
}

/// Ask lifecycle.
///
/// Tracks the in-flight question and its stream channel. The paced writer
/// lives here: it belongs to one response and dies with it.
#[derive(Debug)]
pub enum AskState {
    /// No question in flight.
    Idle,
    /// Question submitted; the request is being issued. For the atomic
    /// flow the whole answer arrives at once via the inbox, tagged with
    /// `seq` so a result from a cancelled question can be told apart from
    /// the live one.
    Asking { seq: u64 },
    /// Stream request sent; no displayable chunk received yet.
    Waiting {
        rx: mpsc::UnboundedReceiver<StreamEvent>,
    },
    /// Chunks arriving; the writer paces them onto the screen.
    Streaming {
        rx: mpsc::UnboundedReceiver<StreamEvent>,
        writer: PacedWriter,
    },
    /// Stream ended; the writer is draining its remaining queue.
    Draining { writer: PacedWriter },
}

impl AskState {
    /// True while a question is in flight in any form.
    pub fn is_busy(&self) -> bool {
        !matches!(self, AskState::Idle)
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Question box.
    pub input: InputState,
    /// Transcript of the current thread.
    pub chat: ChatState,
    /// Sidebar thread list.
    pub threads: ThreadListState,
    /// Current ask lifecycle.
    pub ask: AskState,
    /// Client configuration.
    pub config: Config,
    /// Typing-dots animation frame counter.
    pub spinner_frame: usize,
    /// Transient one-line notice shown in the status bar.
    pub notice: Option<String>,
    /// Monotonic id handed to each submitted question.
    pub ask_seq: u64,
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        Self {
            should_quit: false,
            input: InputState::new(),
            chat: ChatState::default(),
            threads: ThreadListState::default(),
            ask: AskState::Idle,
            config,
            spinner_frame: 0,
            notice: None,
            ask_seq: 0,
        }
    }

    /// Builds the writer for a new streamed response at the configured rate.
    pub fn new_writer(&self) -> PacedWriter {
        PacedWriter::new(self.config.chars_per_tick())
    }

    /// Hands out the id for the next question.
    pub fn next_ask_seq(&mut self) -> u64 {
        self.ask_seq += 1;
        self.ask_seq
    }
}
