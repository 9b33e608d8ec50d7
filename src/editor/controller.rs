//! Cursor and input controller for the bio editor
//!
//! Translates discrete key, pointer and composition events into buffer and
//! cursor edits, then recomputes segments and layout. Nothing here fails:
//! out-of-range requests clamp, and events arriving in the wrong phase are
//! ignored.

use crate::config::BioConfig;
use crate::text::{
    layout_segments, segment_text, BioBuffer, CaretPosition, Cursor, LayoutConfig, Segment,
    TextLayout, TextMeasure,
};

/// Focus / composition state of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// Not focused; key input is ignored
    Idle,
    /// Accepting key and pointer input
    Focused,
    /// An IME session is active; key handling is suspended
    Composing,
}

/// A key event after DOM decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Undo,
    Redo,
    Other,
}

impl EditorKey {
    /// Decode a `KeyboardEvent.key` value and its modifiers
    ///
    /// Ctrl and Meta (Cmd on macOS) are both shortcut modifiers; a shortcut
    /// chord never types its letter.
    pub fn from_dom(key: &str, ctrl: bool, meta: bool, shift: bool) -> Self {
        match key {
            "Backspace" => return EditorKey::Backspace,
            "Delete" => return EditorKey::Delete,
            "ArrowLeft" => return EditorKey::ArrowLeft,
            "ArrowRight" => return EditorKey::ArrowRight,
            "Home" => return EditorKey::Home,
            "End" => return EditorKey::End,
            "Enter" => return EditorKey::Enter,
            _ => {}
        }

        if ctrl || meta {
            return match key {
                "z" | "Z" if shift => EditorKey::Redo,
                "z" | "Z" => EditorKey::Undo,
                "y" | "Y" => EditorKey::Redo,
                _ => EditorKey::Other,
            };
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => EditorKey::Char(ch),
            _ => EditorKey::Other,
        }
    }
}

/// What a key event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Buffer changed and the host was notified
    Edited,
    /// Only the cursor moved
    Moved,
    /// Nothing happened (wrong phase, at a boundary, or buffer full)
    Ignored,
}

impl KeyOutcome {
    pub fn handled(self) -> bool {
        self != KeyOutcome::Ignored
    }
}

type ChangeCallback = Box<dyn FnMut(&str)>;

/// Controlled bio editor
///
/// The host owns the canonical value; every successful edit is reported
/// through the change callback and host re-renders come back through
/// `sync_from_host`.
pub struct BioEditor {
    buffer: BioBuffer,
    cursor: Cursor,
    phase: EditorPhase,
    config: BioConfig,
    measure: Box<dyn TextMeasure>,
    text_width: f32,
    segments: Vec<Segment>,
    layout: TextLayout,
    on_change: Option<ChangeCallback>,
}

impl BioEditor {
    pub fn new(config: BioConfig, measure: Box<dyn TextMeasure>, text_width: f32) -> Self {
        let buffer = BioBuffer::new(config.max_length).with_undo_limit(config.undo_limit);
        let mut editor = Self {
            buffer,
            cursor: Cursor::at_zero(),
            phase: EditorPhase::Idle,
            config,
            measure,
            text_width,
            segments: Vec::new(),
            layout: TextLayout::default(),
            on_change: None,
        };
        editor.refresh();
        editor
    }

    /// Register the host change callback
    pub fn set_on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn value(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.pos
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn config(&self) -> &BioConfig {
        &self.config
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    /// Caret geometry for the current cursor, relative to the text origin
    pub fn caret(&self) -> CaretPosition {
        self.layout.caret_at(self.cursor.pos, self.measure.as_ref())
    }

    /// Available line width changed (resize)
    pub fn set_text_width(&mut self, width: f32) {
        if (width - self.text_width).abs() > f32::EPSILON {
            self.text_width = width;
            self.refresh();
        }
    }

    pub fn focus(&mut self) {
        if self.phase == EditorPhase::Idle {
            self.phase = EditorPhase::Focused;
        }
    }

    pub fn blur(&mut self) {
        self.phase = EditorPhase::Idle;
    }

    pub fn composition_start(&mut self) {
        if self.phase == EditorPhase::Focused {
            self.phase = EditorPhase::Composing;
        }
    }

    /// Finish an IME session, committing the composed text
    pub fn composition_end(&mut self, text: &str) -> KeyOutcome {
        if self.phase != EditorPhase::Composing {
            return KeyOutcome::Ignored;
        }
        self.phase = EditorPhase::Focused;
        self.insert_text(text)
    }

    pub fn handle_key(&mut self, key: EditorKey) -> KeyOutcome {
        if self.phase != EditorPhase::Focused {
            return KeyOutcome::Ignored;
        }

        match key {
            EditorKey::Char(ch) => self.insert_char(ch),
            EditorKey::Enter => self.insert_char('\n'),
            EditorKey::Backspace => self.backspace(),
            EditorKey::Delete => self.delete_forward(),
            EditorKey::ArrowLeft => {
                let before = self.cursor.pos;
                self.cursor.move_left();
                self.moved_from(before)
            }
            EditorKey::ArrowRight => {
                let before = self.cursor.pos;
                self.cursor.move_right(self.buffer.len());
                self.moved_from(before)
            }
            EditorKey::Home => {
                let before = self.cursor.pos;
                self.cursor.home();
                self.moved_from(before)
            }
            EditorKey::End => {
                let before = self.cursor.pos;
                self.cursor.end(self.buffer.len());
                self.moved_from(before)
            }
            EditorKey::Undo => match self.buffer.undo() {
                Some(pos) => self.edited_to(pos),
                None => KeyOutcome::Ignored,
            },
            EditorKey::Redo => match self.buffer.redo() {
                Some(pos) => self.edited_to(pos),
                None => KeyOutcome::Ignored,
            },
            EditorKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Insert one character at the cursor; ignored when the buffer is full
    pub fn insert_char(&mut self, ch: char) -> KeyOutcome {
        if !self.buffer.insert_char(self.cursor.pos, ch) {
            log::debug!("bio buffer full ({} chars), dropping input", self.buffer.len());
            return KeyOutcome::Ignored;
        }
        self.edited_to(self.cursor.pos + 1)
    }

    /// Insert pasted or composed text, clipped to the remaining capacity
    pub fn insert_text(&mut self, text: &str) -> KeyOutcome {
        let inserted = self.buffer.insert_str(self.cursor.pos, text);
        if inserted == 0 {
            return KeyOutcome::Ignored;
        }
        self.edited_to(self.cursor.pos + inserted)
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) -> KeyOutcome {
        if self.cursor.pos == 0 {
            return KeyOutcome::Ignored;
        }
        let pos = self.cursor.pos - 1;
        match self.buffer.delete_char(pos) {
            Some(_) => self.edited_to(pos),
            None => KeyOutcome::Ignored,
        }
    }

    /// Remove the character at the cursor
    pub fn delete_forward(&mut self) -> KeyOutcome {
        match self.buffer.delete_char(self.cursor.pos) {
            Some(_) => self.edited_to(self.cursor.pos),
            None => KeyOutcome::Ignored,
        }
    }

    /// Pointer click in CSS pixels relative to the canvas box
    ///
    /// Focuses the editor and places the cursor at the nearest offset.
    pub fn click(&mut self, x: f32, y: f32) -> usize {
        // The IME owns the insertion point until composition ends
        if self.phase == EditorPhase::Composing {
            return self.cursor.pos;
        }
        if self.phase == EditorPhase::Idle {
            self.phase = EditorPhase::Focused;
        }
        let padding = self.config.padding;
        let offset = self.layout.offset_at_point(x - padding, y - padding);
        self.cursor.move_to(offset, self.buffer.len());
        self.cursor.pos
    }

    /// Resynchronize with the host after it re-rendered
    ///
    /// The host value wins; the cursor follows the real input element's
    /// selection start when one is given. Does not call the change callback.
    pub fn sync_from_host(&mut self, value: &str, selection_start: Option<usize>) {
        if value != self.buffer.text() {
            self.buffer.set_text(value);
            self.refresh();
        }
        let target = selection_start.unwrap_or(self.cursor.pos);
        self.cursor.move_to(target, self.buffer.len());
    }

    fn moved_from(&self, before: usize) -> KeyOutcome {
        if self.cursor.pos == before {
            KeyOutcome::Ignored
        } else {
            KeyOutcome::Moved
        }
    }

    fn edited_to(&mut self, cursor: usize) -> KeyOutcome {
        self.cursor.move_to(cursor, self.buffer.len());
        self.refresh();
        let value = self.buffer.text();
        if let Some(callback) = self.on_change.as_mut() {
            callback(&value);
        }
        KeyOutcome::Edited
    }

    /// Recompute segments and layout from the buffer
    fn refresh(&mut self) {
        let text = self.buffer.text();
        self.segments = segment_text(&text, self.measure.as_ref());
        self.layout = layout_segments(
            &self.segments,
            self.measure.as_ref(),
            LayoutConfig {
                max_width: self.text_width,
                line_height: self.config.line_height,
            },
        );
        self.cursor.clamp(self.buffer.len());
    }
}
