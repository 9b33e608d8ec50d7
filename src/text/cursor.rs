//! Cursor management for the bio buffer
//!
//! Pure character offsets with no knowledge of rendering.

use serde::{Deserialize, Serialize};

/// Cursor state for single-buffer text editing
///
/// `pos` is a character offset, always within `0..=len` of the buffer it
/// belongs to. Every movement takes the current buffer length and clamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub pos: usize,
}

impl Cursor {
    pub fn new(pos: usize) -> Self {
        Self { pos }
    }

    pub fn at_zero() -> Self {
        Self { pos: 0 }
    }

    /// Move cursor to a position, clamped to `[0, len]`
    pub fn move_to(&mut self, pos: usize, len: usize) {
        self.pos = pos.min(len);
    }

    pub fn move_left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn move_right(&mut self, len: usize) {
        self.pos = (self.pos + 1).min(len);
    }

    pub fn home(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self, len: usize) {
        self.pos = len;
    }

    /// Re-clamp after the buffer changed underneath the cursor
    pub fn clamp(&mut self, len: usize) {
        if self.pos > len {
            self.pos = len;
        }
    }
}
