//! Single-line text input.
//!
//! Used both for the question box and the rename overlay. The cursor is a
//! char index, not a byte index; edits go through `char_indices` so
//! multi-byte input (the backend speaks Korean) is handled correctly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Default, Clone)]
pub struct InputState {
    buffer: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Takes the buffer, resetting the input.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map_or(self.buffer.len(), |(b, _)| b)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = self.byte_at(self.cursor);
            self.buffer.remove(at);
        }
    }

    /// Routes an editing key. Returns true if the event was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.buffer.chars().count();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_are_char_based() {
        let mut input = InputState::new();
        for c in "생성a".chars() {
            input.insert(c);
        }
        assert_eq!(input.text(), "생성a");

        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "생");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_insert_mid_buffer() {
        let mut input = InputState::new();
        for c in "ac".chars() {
            input.insert(c);
        }
        input.handle_key(&KeyEvent::from(KeyCode::Left));
        input.insert('b');
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn test_take_resets() {
        let mut input = InputState::new();
        input.insert('x');
        assert_eq!(input.take(), "x");
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_blank_detection() {
        let mut input = InputState::new();
        assert!(input.is_blank());
        input.insert(' ');
        assert!(input.is_blank());
        input.insert('q');
        assert!(!input.is_blank());
    }
}
