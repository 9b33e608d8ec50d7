//! Line wrapping and geometry for segmented text
//!
//! Turns the segment list into positioned runs on wrapped lines, and maps
//! between character offsets and points inside that geometry. Coordinates
//! are CSS pixels relative to the text origin (padding already removed).
//!
//! Plain segments wrap at word boundaries; link and email segments are kept
//! whole unless a single one is wider than the line, in which case it is
//! broken by characters like any oversize word.

use serde::{Deserialize, Serialize};

use super::measure::TextMeasure;
use super::segment::{Segment, SegmentKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Available width for text on one line
    pub max_width: f32,
    pub line_height: f32,
}

/// A positioned piece of a segment on one wrapped line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRun {
    /// Index into the segment list
    pub segment: usize,
    pub kind: SegmentKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub x: f32,
    pub line: usize,
    pub width: f32,
}

impl LayoutRun {
    pub fn char_count(&self) -> usize {
        self.end - self.start
    }

    /// Averaged advance of one character in this run
    pub fn avg_char_width(&self) -> f32 {
        match self.char_count() {
            0 => 0.0,
            n => self.width / n as f32,
        }
    }
}

/// Wrapped geometry of the whole text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayout {
    pub runs: Vec<LayoutRun>,
    /// Character offset at which each line begins
    pub line_starts: Vec<usize>,
    pub line_height: f32,
    /// Offsets that begin a line because of a hard break
    hard_break_starts: Vec<usize>,
}

/// Caret geometry for a character offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaretPosition {
    pub x: f32,
    pub line: usize,
}

struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    kind: TokenKind,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Space,
    Newline,
}

/// Split a plain segment into words, whitespace runs and hard breaks
fn tokenize(text: &str, base: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut current: Option<(usize, usize, TokenKind)> = None; // byte start, char start, kind
    let mut char_idx = base;

    for (byte_idx, ch) in text.char_indices() {
        let kind = if ch == '\n' {
            TokenKind::Newline
        } else if ch.is_whitespace() {
            TokenKind::Space
        } else {
            TokenKind::Word
        };

        match current {
            Some((_, _, k)) if k == kind && kind != TokenKind::Newline => {}
            Some((b, c, k)) => {
                tokens.push(Token { text: &text[b..byte_idx], start: c, end: char_idx, kind: k });
                current = Some((byte_idx, char_idx, kind));
            }
            None => current = Some((byte_idx, char_idx, kind)),
        }
        char_idx += 1;
    }

    if let Some((b, c, k)) = current {
        tokens.push(Token { text: &text[b..], start: c, end: char_idx, kind: k });
    }
    tokens
}

struct LineBuilder<'m> {
    measure: &'m dyn TextMeasure,
    config: LayoutConfig,
    x: f32,
    line: usize,
    layout: TextLayout,
}

impl<'m> LineBuilder<'m> {
    fn new_line(&mut self, start: usize) {
        self.line += 1;
        self.x = 0.0;
        self.layout.line_starts.push(start);
    }

    fn push_run(&mut self, segment: usize, kind: SegmentKind, text: &str, start: usize, width: f32) {
        let end = start + text.chars().count();
        self.layout.runs.push(LayoutRun {
            segment,
            kind,
            text: text.to_string(),
            start,
            end,
            x: self.x,
            line: self.line,
            width,
        });
        self.x += width;
    }

    /// Place a token that may not fit on the current line
    fn place(&mut self, segment: usize, kind: SegmentKind, text: &str, start: usize, breakable: bool) {
        let width = self.measure.measure(text);

        if breakable && self.x > 0.0 && self.x + width > self.config.max_width {
            self.new_line(start);
        }

        if width <= self.config.max_width || !breakable {
            self.push_run(segment, kind, text, start, width);
            return;
        }

        // Oversize token: break by characters, at least one per line
        let mut chunk = String::new();
        let mut chunk_start = start;
        for ch in text.chars() {
            let mut candidate = chunk.clone();
            candidate.push(ch);
            if !chunk.is_empty() && self.x + self.measure.measure(&candidate) > self.config.max_width {
                let chunk_width = self.measure.measure(&chunk);
                self.push_run(segment, kind, &chunk, chunk_start, chunk_width);
                chunk_start += chunk.chars().count();
                self.new_line(chunk_start);
                chunk.clear();
                chunk.push(ch);
            } else {
                chunk = candidate;
            }
        }
        if !chunk.is_empty() {
            let chunk_width = self.measure.measure(&chunk);
            self.push_run(segment, kind, &chunk, chunk_start, chunk_width);
        }
    }
}

/// Wrap segments into lines
pub fn layout_segments(
    segments: &[Segment],
    measure: &dyn TextMeasure,
    config: LayoutConfig,
) -> TextLayout {
    let mut builder = LineBuilder {
        measure,
        config,
        x: 0.0,
        line: 0,
        layout: TextLayout {
            runs: Vec::new(),
            line_starts: vec![0],
            line_height: config.line_height,
            hard_break_starts: Vec::new(),
        },
    };

    for (index, segment) in segments.iter().enumerate() {
        let kind = segment.kind();
        if kind != SegmentKind::Plain {
            builder.place(index, kind, &segment.text, segment.start, true);
            continue;
        }

        for token in tokenize(&segment.text, segment.start) {
            match token.kind {
                TokenKind::Newline => {
                    builder.new_line(token.end);
                    builder.layout.hard_break_starts.push(token.end);
                }
                // Trailing spaces may hang past the edge
                TokenKind::Space => builder.place(index, kind, token.text, token.start, false),
                TokenKind::Word => builder.place(index, kind, token.text, token.start, true),
            }
        }
    }

    builder.layout
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.line_starts.len().max(1)
    }

    pub fn runs_on_line(&self, line: usize) -> impl Iterator<Item = &LayoutRun> {
        self.runs.iter().filter(move |run| run.line == line)
    }

    /// Nearest character offset to a point
    ///
    /// Uses the run's averaged character width rather than per-glyph
    /// boundaries, so proportional fonts land within a character or so.
    pub fn offset_at_point(&self, x: f32, y: f32) -> usize {
        let last_line = self.line_count() - 1;
        let line = if y <= 0.0 || self.line_height <= 0.0 {
            0
        } else {
            ((y / self.line_height).floor() as usize).min(last_line)
        };

        let mut last_on_line: Option<&LayoutRun> = None;
        for run in self.runs_on_line(line) {
            if x < run.x + run.width {
                let avg = run.avg_char_width();
                if avg <= 0.0 {
                    return run.start;
                }
                let idx = ((x - run.x) / avg).round().max(0.0) as usize;
                return run.start + idx.min(run.char_count());
            }
            last_on_line = Some(run);
        }

        match last_on_line {
            Some(run) => run.end,
            None => self.line_starts.get(line).copied().unwrap_or(0),
        }
    }

    /// Caret geometry for a character offset
    pub fn caret_at(&self, pos: usize, measure: &dyn TextMeasure) -> CaretPosition {
        if let Some(run) = self.runs.iter().find(|run| run.start <= pos && pos < run.end) {
            let prefix: String = run.text.chars().take(pos - run.start).collect();
            return CaretPosition { x: run.x + measure.measure(&prefix), line: run.line };
        }

        if let Some(idx) = self.hard_break_starts.iter().position(|&start| start == pos) {
            let start = self.hard_break_starts[idx];
            let line = self.line_starts.iter().rposition(|&s| s == start).unwrap_or(0);
            return CaretPosition { x: 0.0, line };
        }

        if let Some(run) = self.runs.iter().rev().find(|run| run.end == pos) {
            return CaretPosition { x: run.x + run.width, line: run.line };
        }

        CaretPosition { x: 0.0, line: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::measure::FixedWidthMeasure;
    use crate::text::segment::segment_text;

    const MEASURE: FixedWidthMeasure = FixedWidthMeasure { char_width: 10.0 };

    fn layout(text: &str, max_width: f32) -> TextLayout {
        let segments = segment_text(text, &MEASURE);
        layout_segments(&segments, &MEASURE, LayoutConfig { max_width, line_height: 20.0 })
    }

    #[test]
    fn test_single_line_fits() {
        let l = layout("hello world", 200.0);
        assert_eq!(l.line_count(), 1);
        assert!(l.runs.iter().all(|r| r.line == 0));
    }

    #[test]
    fn test_words_wrap_to_next_line() {
        // "hello " is 60px, "world" would end at 110px
        let l = layout("hello world", 100.0);
        assert_eq!(l.line_count(), 2);
        let world = l.runs.iter().find(|r| r.text == "world").unwrap();
        assert_eq!(world.line, 1);
        assert_eq!(world.x, 0.0);
        assert_eq!(l.line_starts, vec![0, 6]);
    }

    #[test]
    fn test_oversize_word_breaks_by_chars() {
        let l = layout("abcdefghijkl", 50.0);
        let texts: Vec<&str> = l.runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["abcde", "fghij", "kl"]);
        assert_eq!(l.line_count(), 3);
    }

    #[test]
    fn test_link_kept_whole_when_it_fits() {
        let l = layout("go to rust-lang.org", 140.0);
        let link = l.runs.iter().find(|r| r.kind == SegmentKind::Link).unwrap();
        assert_eq!(link.text, "rust-lang.org");
        assert_eq!(link.line, 1);
    }

    #[test]
    fn test_hard_break_starts_new_line() {
        let l = layout("ab\ncd", 200.0);
        assert_eq!(l.line_count(), 2);
        assert_eq!(l.line_starts, vec![0, 3]);
        let cd = l.runs.iter().find(|r| r.text == "cd").unwrap();
        assert_eq!(cd.line, 1);
    }

    #[test]
    fn test_offset_at_point_uses_average_width() {
        let l = layout("hello world", 200.0);
        assert_eq!(l.offset_at_point(0.0, 5.0), 0);
        assert_eq!(l.offset_at_point(14.0, 5.0), 1);
        assert_eq!(l.offset_at_point(16.0, 5.0), 2);
        // Past the end of the line
        assert_eq!(l.offset_at_point(500.0, 5.0), 11);
    }

    #[test]
    fn test_offset_at_point_on_wrapped_line() {
        let l = layout("hello world", 100.0);
        assert_eq!(l.offset_at_point(20.0, 25.0), 8);
        // Below the last line clamps to it
        assert_eq!(l.offset_at_point(20.0, 400.0), 8);
    }

    #[test]
    fn test_offset_on_empty_line() {
        let l = layout("ab\n\ncd", 200.0);
        assert_eq!(l.offset_at_point(30.0, 25.0), 3);
    }

    #[test]
    fn test_caret_positions() {
        let l = layout("hello world", 100.0);
        assert_eq!(l.caret_at(0, &MEASURE), CaretPosition { x: 0.0, line: 0 });
        assert_eq!(l.caret_at(3, &MEASURE), CaretPosition { x: 30.0, line: 0 });
        assert_eq!(l.caret_at(6, &MEASURE), CaretPosition { x: 0.0, line: 1 });
        assert_eq!(l.caret_at(11, &MEASURE), CaretPosition { x: 50.0, line: 1 });
    }

    #[test]
    fn test_caret_after_hard_break() {
        let l = layout("ab\n", 200.0);
        assert_eq!(l.caret_at(2, &MEASURE), CaretPosition { x: 20.0, line: 0 });
        assert_eq!(l.caret_at(3, &MEASURE), CaretPosition { x: 0.0, line: 1 });
    }

    #[test]
    fn test_empty_layout() {
        let l = layout("", 100.0);
        assert_eq!(l.line_count(), 1);
        assert_eq!(l.offset_at_point(50.0, 50.0), 0);
        assert_eq!(l.caret_at(0, &MEASURE), CaretPosition { x: 0.0, line: 0 });
    }
}
