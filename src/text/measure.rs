//! Text width measurement
//!
//! The layout and segmenter never talk to a font directly; they ask a
//! `TextMeasure`. In the browser this is backed by the canvas context's
//! `measureText`, in tests by a fixed advance per character.

/// Measures the rendered width of a run of text in CSS pixels
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

/// Every character advances by the same width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMeasure {
    pub char_width: f32,
}

impl FixedWidthMeasure {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl Default for FixedWidthMeasure {
    fn default() -> Self {
        // Roughly the advance of a 14px sans-serif glyph
        Self::new(8.0)
    }
}

impl TextMeasure for FixedWidthMeasure {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_counts_chars_not_bytes() {
        let measure = FixedWidthMeasure::new(10.0);
        assert_eq!(measure.measure("héllo"), 50.0);
        assert_eq!(measure.measure(""), 0.0);
    }
}
