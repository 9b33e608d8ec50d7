//! Canvas text surface
//!
//! Computes device-pixel-ratio scaled canvas dimensions and turns the
//! editor's layout into a display list of draw operations. The WASM layer
//! paints the list onto a `CanvasRenderingContext2d`; keeping the list as
//! plain data lets the geometry be tested without a browser.

use serde::{Deserialize, Serialize};

use super::controller::{BioEditor, EditorPhase};
use crate::text::SegmentKind;

/// Caret on/off half-period in milliseconds
pub const CARET_BLINK_MS: f64 = 530.0;

/// Whether the caret is in its visible blink phase
pub fn caret_visible(elapsed_ms: f64) -> bool {
    (elapsed_ms.max(0.0) % (CARET_BLINK_MS * 2.0)) < CARET_BLINK_MS
}

/// Canvas size in CSS pixels and backing-store pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDimensions {
    pub css_width: f32,
    pub css_height: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Context scale so drawing happens in CSS pixels
    pub scale: f32,
}

impl Default for CanvasDimensions {
    fn default() -> Self {
        Self {
            css_width: 0.0,
            css_height: 0.0,
            pixel_width: 0,
            pixel_height: 0,
            scale: 1.0,
        }
    }
}

/// One drawing operation in CSS pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Clear {
        width: f32,
        height: f32,
        color: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: String,
    },
    /// Text drawn with a middle baseline at `y`
    FillText {
        text: String,
        x: f32,
        y: f32,
        color: String,
    },
    Caret {
        x: f32,
        y: f32,
        height: f32,
        color: String,
    },
}

/// Everything needed to repaint the canvas once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayList {
    pub font: String,
    pub dimensions: CanvasDimensions,
    pub ops: Vec<DrawOp>,
}

/// Owns canvas dimensions; renders an editor into a display list
#[derive(Debug, Clone, Default)]
pub struct CanvasSurface {
    dimensions: CanvasDimensions,
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> CanvasDimensions {
        self.dimensions
    }

    /// Recompute backing-store size for a CSS box and device pixel ratio
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) -> CanvasDimensions {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let css_width = css_width.max(0.0);
        let css_height = css_height.max(0.0);
        self.dimensions = CanvasDimensions {
            css_width,
            css_height,
            pixel_width: (css_width * scale).ceil() as u32,
            pixel_height: (css_height * scale).ceil() as u32,
            scale,
        };
        self.dimensions
    }

    /// Width available to text once padding is removed
    pub fn text_width(&self, padding: f32) -> f32 {
        (self.dimensions.css_width - padding * 2.0).max(0.0)
    }

    pub fn render(&self, editor: &BioEditor, elapsed_ms: f64) -> DisplayList {
        let config = editor.config();
        let layout = editor.layout();
        let padding = config.padding;
        let line_height = config.line_height;

        let mut ops = vec![DrawOp::Clear {
            width: self.dimensions.css_width,
            height: self.dimensions.css_height,
            color: config.background_color.clone(),
        }];

        // Highlight boxes first so text draws on top
        for run in &layout.runs {
            let color = match run.kind {
                SegmentKind::Link => &config.link_background,
                SegmentKind::Email => &config.email_background,
                SegmentKind::Plain => continue,
            };
            ops.push(DrawOp::FillRect {
                x: padding + run.x,
                y: padding + run.line as f32 * line_height,
                width: run.width,
                height: line_height,
                color: color.clone(),
            });
        }

        for run in &layout.runs {
            if run.text.trim().is_empty() {
                continue;
            }
            let color = match run.kind {
                SegmentKind::Link => &config.link_text_color,
                SegmentKind::Email => &config.email_text_color,
                SegmentKind::Plain => &config.text_color,
            };
            ops.push(DrawOp::FillText {
                text: run.text.clone(),
                x: padding + run.x,
                y: padding + run.line as f32 * line_height + line_height / 2.0,
                color: color.clone(),
            });
        }

        if editor.phase() != EditorPhase::Idle && caret_visible(elapsed_ms) {
            let caret = editor.caret();
            ops.push(DrawOp::Caret {
                x: padding + caret.x,
                y: padding + caret.line as f32 * line_height,
                height: line_height,
                color: config.caret_color.clone(),
            });
        }

        DisplayList {
            font: config.font(),
            dimensions: self.dimensions,
            ops,
        }
    }
}
