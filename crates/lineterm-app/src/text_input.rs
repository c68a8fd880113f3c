//! Single-line text field.
//!
//! Owns the edit buffer and cursor of one input widget. The cursor counts
//! characters, not bytes, so multi-byte input edits correctly.

use crate::KeyInput;

/// Editable single-line text with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl TextInput {
    /// Empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Field holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::with_text(text);
    }

    /// Clear the field.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Apply an editing key. Returns `false` for keys the field ignores.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            },
            KeyInput::Right => {
                if self.cursor < self.char_count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            KeyInput::ClearLine => self.clear(),
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::BackTab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down
            | KeyInput::PageUp
            | KeyInput::PageDown => return false,
        }
        true
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of character index `chars`.
    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
