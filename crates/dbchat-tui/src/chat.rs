//! Chat transcript state.

use dbchat_api::{Message, Role};

/// One rendered unit of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bubble {
    /// A question from the user.
    User(String),
    /// An answer. `streaming` while text is still being appended.
    Ai { content: String, streaming: bool },
    /// Typing-dots placeholder shown while waiting for the first byte.
    Pending,
    /// A failure, rendered in place of the answer.
    Error(String),
}

/// Transcript of the current thread.
#[derive(Debug, Default)]
pub struct ChatState {
    pub bubbles: Vec<Bubble>,
    /// Lines scrolled up from the bottom. Zero follows the stream.
    pub scroll_offset: usize,
}

impl ChatState {
    /// Replaces the transcript with a thread's stored messages.
    pub fn load_messages(&mut self, messages: Vec<Message>) {
        self.bubbles = messages
            .into_iter()
            .filter_map(|m| match m.role {
                Role::User => Some(Bubble::User(m.content)),
                Role::Ai => Some(Bubble::Ai {
                    content: m.content,
                    streaming: false,
                }),
                Role::Other => None,
            })
            .collect();
        self.scroll_offset = 0;
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.scroll_offset = 0;
    }

    pub fn push(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
        self.scroll_offset = 0;
    }

    /// Swaps the trailing placeholder for a new bubble. A streaming answer
    /// that never displayed any text counts as a placeholder too; with
    /// neither present the bubble is appended instead.
    pub fn replace_pending(&mut self, bubble: Bubble) {
        let replace = match self.bubbles.last() {
            Some(Bubble::Pending) => true,
            Some(Bubble::Ai {
                content,
                streaming: true,
            }) => content.is_empty(),
            _ => false,
        };
        if replace {
            let last = self.bubbles.len() - 1;
            self.bubbles[last] = bubble;
        } else {
            self.bubbles.push(bubble);
        }
        self.scroll_offset = 0;
    }

    /// Appends paced text to the trailing streaming answer.
    pub fn append_streaming(&mut self, text: &str) {
        if let Some(Bubble::Ai {
            content,
            streaming: true,
        }) = self.bubbles.last_mut()
        {
            content.push_str(text);
        }
    }

    /// Marks the trailing streaming answer as complete.
    pub fn finalize_streaming(&mut self) {
        if let Some(Bubble::Ai { streaming, .. }) = self.bubbles.last_mut() {
            *streaming = false;
        }
    }

    /// True if the trailing streaming answer has received any text yet.
    pub fn streaming_has_content(&self) -> bool {
        matches!(
            self.bubbles.last(),
            Some(Bubble::Ai { content, streaming: true }) if !content.is_empty()
        )
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }
}
