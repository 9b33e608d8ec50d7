//! Bio text buffer
//!
//! Character-indexed storage with a hard length cap and a bounded
//! undo/redo history. No knowledge of rendering or links.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default maximum bio length in characters
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Text editing operation for undo/redo
///
/// Positions are character offsets at the time the edit was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEdit {
    Insert(usize, String),
    Delete(usize, String),
}

impl TextEdit {
    /// Cursor position after the edit has been applied
    fn cursor_after_apply(&self) -> usize {
        match self {
            TextEdit::Insert(pos, text) => pos + text.chars().count(),
            TextEdit::Delete(pos, _) => *pos,
        }
    }

    /// Cursor position after the edit has been reverted
    fn cursor_after_revert(&self) -> usize {
        match self {
            TextEdit::Insert(pos, _) => *pos,
            TextEdit::Delete(pos, text) => pos + text.chars().count(),
        }
    }
}

/// Length-capped character buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioBuffer {
    chars: Vec<char>,
    max_length: usize,
    undo_stack: VecDeque<TextEdit>,
    redo_stack: Vec<TextEdit>,
    undo_limit: usize,
}

impl BioBuffer {
    /// Create a new empty buffer
    pub fn new(max_length: usize) -> Self {
        Self {
            chars: Vec::new(),
            max_length,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            undo_limit: 100,
        }
    }

    /// Create a buffer from a string, truncated to `max_length` characters
    pub fn from_str(s: &str, max_length: usize) -> Self {
        let mut buffer = Self::new(max_length);
        buffer.chars = s.chars().take(max_length).collect();
        buffer
    }

    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn is_full(&self) -> bool {
        self.chars.len() >= self.max_length
    }

    /// Characters that can still be inserted
    pub fn remaining(&self) -> usize {
        self.max_length.saturating_sub(self.chars.len())
    }

    /// Convert buffer to string
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Insert a character at a position
    ///
    /// Returns false without touching the buffer when it is full.
    pub fn insert_char(&mut self, pos: usize, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        let pos = pos.min(self.chars.len());
        self.chars.insert(pos, ch);
        self.push_undo(TextEdit::Insert(pos, ch.to_string()));
        true
    }

    /// Insert a string at a position, clipped to the remaining capacity
    ///
    /// Returns the number of characters actually inserted.
    pub fn insert_str(&mut self, pos: usize, text: &str) -> usize {
        let clipped: Vec<char> = text.chars().take(self.remaining()).collect();
        if clipped.is_empty() {
            return 0;
        }
        let pos = pos.min(self.chars.len());
        let count = clipped.len();
        self.chars.splice(pos..pos, clipped.iter().copied());
        self.push_undo(TextEdit::Insert(pos, clipped.into_iter().collect()));
        count
    }

    /// Delete the character at a position
    pub fn delete_char(&mut self, pos: usize) -> Option<char> {
        if pos >= self.chars.len() {
            return None;
        }
        let ch = self.chars.remove(pos);
        self.push_undo(TextEdit::Delete(pos, ch.to_string()));
        Some(ch)
    }

    /// Replace the whole content (host-driven), dropping edit history
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().take(self.max_length).collect();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo the last edit, returning the cursor position to restore
    pub fn undo(&mut self) -> Option<usize> {
        let edit = self.undo_stack.pop_back()?;
        self.revert(&edit);
        let cursor = edit.cursor_after_revert();
        self.redo_stack.push(edit);
        Some(cursor)
    }

    /// Redo the last undone edit, returning the cursor position to restore
    pub fn redo(&mut self) -> Option<usize> {
        let edit = self.redo_stack.pop()?;
        self.apply(&edit);
        let cursor = edit.cursor_after_apply();
        self.undo_stack.push_back(edit);
        Some(cursor)
    }

    fn apply(&mut self, edit: &TextEdit) {
        match edit {
            TextEdit::Insert(pos, text) => {
                let pos = (*pos).min(self.chars.len());
                self.chars.splice(pos..pos, text.chars());
            }
            TextEdit::Delete(pos, text) => {
                let start = (*pos).min(self.chars.len());
                let end = (start + text.chars().count()).min(self.chars.len());
                self.chars.drain(start..end);
            }
        }
    }

    fn revert(&mut self, edit: &TextEdit) {
        match edit {
            TextEdit::Insert(pos, text) => {
                let start = (*pos).min(self.chars.len());
                let end = (start + text.chars().count()).min(self.chars.len());
                self.chars.drain(start..end);
            }
            TextEdit::Delete(pos, text) => {
                let pos = (*pos).min(self.chars.len());
                self.chars.splice(pos..pos, text.chars());
            }
        }
    }

    /// Add an edit to the undo stack, clearing redo
    fn push_undo(&mut self, edit: TextEdit) {
        self.undo_stack.push_back(edit);
        while self.undo_stack.len() > self.undo_limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }
}

impl Default for BioBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_truncates() {
        let buffer = BioBuffer::from_str("abcdef", 4);
        assert_eq!(buffer.text(), "abcd");
        assert!(buffer.is_full());
    }

    #[test]
    fn test_insert_char() {
        let mut buffer = BioBuffer::from_str("hello", 10);
        assert!(buffer.insert_char(5, '!'));
        assert_eq!(buffer.text(), "hello!");
    }

    #[test]
    fn test_insert_char_rejected_when_full() {
        let mut buffer = BioBuffer::from_str("abc", 3);
        assert!(!buffer.insert_char(1, 'x'));
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_insert_str_clipped_to_capacity() {
        let mut buffer = BioBuffer::from_str("ab", 5);
        let inserted = buffer.insert_str(1, "wxyz");
        assert_eq!(inserted, 3);
        assert_eq!(buffer.text(), "awxyb");
    }

    #[test]
    fn test_delete_char() {
        let mut buffer = BioBuffer::from_str("hello!", 10);
        assert_eq!(buffer.delete_char(5), Some('!'));
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.delete_char(5), None);
    }

    #[test]
    fn test_multibyte_chars_are_single_positions() {
        let mut buffer = BioBuffer::from_str("héllo", 10);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.delete_char(1), Some('é'));
        assert_eq!(buffer.text(), "hllo");
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = BioBuffer::from_str("abc", 10);

        buffer.insert_char(3, 'd');
        assert_eq!(buffer.text(), "abcd");

        assert_eq!(buffer.undo(), Some(3));
        assert_eq!(buffer.text(), "abc");

        assert_eq!(buffer.redo(), Some(4));
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_undo_delete_restores_text() {
        let mut buffer = BioBuffer::from_str("abc", 10);
        buffer.delete_char(0);
        assert_eq!(buffer.text(), "bc");
        assert_eq!(buffer.undo(), Some(1));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = BioBuffer::from_str("a", 10);
        buffer.insert_char(1, 'b');
        buffer.undo();
        assert!(buffer.can_redo());
        buffer.insert_char(1, 'c');
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_undo_limit_drops_oldest() {
        let mut buffer = BioBuffer::new(10).with_undo_limit(2);
        buffer.insert_char(0, 'a');
        buffer.insert_char(1, 'b');
        buffer.insert_char(2, 'c');
        assert!(buffer.undo().is_some());
        assert!(buffer.undo().is_some());
        assert!(buffer.undo().is_none());
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_set_text_drops_history() {
        let mut buffer = BioBuffer::new(4);
        buffer.insert_char(0, 'a');
        buffer.set_text("longer than four");
        assert_eq!(buffer.text(), "long");
        assert!(!buffer.can_undo());
    }
}
