//! Canvas bio input exported to JavaScript
//!
//! `BioInput` owns a `BioEditor` and paints it onto a canvas. The host
//! component forwards DOM events (keydown, click, composition, paste) and
//! drives `render` from `requestAnimationFrame` for the caret blink.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::helpers::{deserialize_optional, describe_js, js_error, serialize};
use crate::config::BioConfig;
use crate::editor::{BioEditor, CanvasSurface, DisplayList, DrawOp, EditorKey};
use crate::text::{segment_text, FixedWidthMeasure, TextMeasure};

/// Width of the painted caret in CSS pixels
const CARET_WIDTH: f64 = 1.5;

/// Measures text with the canvas context's current font
struct CanvasMeasure {
    context: CanvasRenderingContext2d,
}

impl TextMeasure for CanvasMeasure {
    fn measure(&self, text: &str) -> f32 {
        match self.context.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(e) => {
                log::warn!("measureText failed: {}", describe_js(&e));
                0.0
            }
        }
    }
}

#[wasm_bindgen]
pub struct BioInput {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    surface: CanvasSurface,
    editor: BioEditor,
}

#[wasm_bindgen]
impl BioInput {
    /// Attach to a canvas; `config` is an optional partial `BioConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: JsValue) -> Result<BioInput, JsValue> {
        let config: BioConfig = deserialize_optional(config, "Invalid BioInput config")?.unwrap_or_default();

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("Canvas 2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| js_error("Canvas context is not a CanvasRenderingContext2d"))?;
        context.set_font(&config.font());

        let measure = Box::new(CanvasMeasure {
            context: context.clone(),
        });
        let editor = BioEditor::new(config, measure, 0.0);

        let mut input = BioInput {
            canvas,
            context,
            surface: CanvasSurface::new(),
            editor,
        };

        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = input.canvas.client_width() as f32;
        let height = input.canvas.client_height() as f32;
        input.resize(width, height, dpr as f32)?;

        log::debug!("BioInput attached ({}x{} @{}x)", width, height, dpr);
        Ok(input)
    }

    /// Register the change callback, called with the new value after each edit
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        self.editor.set_on_change(move |value: &str| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(value)) {
                log::error!("BioInput change callback threw: {}", describe_js(&e));
            }
        });
    }

    pub fn focus(&mut self) {
        self.editor.focus();
    }

    pub fn blur(&mut self) {
        self.editor.blur();
    }

    /// Returns true when the key was consumed and the default should be prevented
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, ctrl: bool, meta: bool, shift: bool) -> bool {
        self.editor.handle_key(EditorKey::from_dom(key, ctrl, meta, shift)).handled()
    }

    /// Click in CSS pixels relative to the canvas; returns the new cursor offset
    pub fn click(&mut self, x: f32, y: f32) -> usize {
        self.editor.click(x, y)
    }

    #[wasm_bindgen(js_name = compositionStart)]
    pub fn composition_start(&mut self) {
        self.editor.composition_start();
    }

    #[wasm_bindgen(js_name = compositionEnd)]
    pub fn composition_end(&mut self, text: &str) -> bool {
        self.editor.composition_end(text).handled()
    }

    pub fn paste(&mut self, text: &str) -> bool {
        self.editor.insert_text(text).handled()
    }

    #[wasm_bindgen(js_name = syncFromHost)]
    pub fn sync_from_host(&mut self, value: &str, selection_start: Option<usize>) {
        self.editor.sync_from_host(value, selection_start);
    }

    /// Resize the backing store; resets the context transform and font
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Result<(), JsValue> {
        let dims = self.surface.resize(css_width, css_height, device_pixel_ratio);
        self.canvas.set_width(dims.pixel_width);
        self.canvas.set_height(dims.pixel_height);

        let scale = dims.scale as f64;
        self.context.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
        self.context.set_font(&self.editor.config().font());

        let text_width = self.surface.text_width(self.editor.config().padding);
        self.editor.set_text_width(text_width);
        Ok(())
    }

    /// Repaint; `elapsed_ms` drives the caret blink
    pub fn render(&self, elapsed_ms: f64) -> Result<(), JsValue> {
        let list = self.surface.render(&self.editor, elapsed_ms);
        paint(&self.context, &list)
    }

    pub fn value(&self) -> String {
        self.editor.value()
    }

    pub fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    pub fn segments(&self) -> Result<JsValue, JsValue> {
        serialize(&self.editor.segments(), "Failed to serialize segments")
    }
}

/// Segment text with a fixed-width measure (no canvas needed)
#[wasm_bindgen(js_name = segmentText)]
pub fn segment_text_js(text: &str) -> Result<JsValue, JsValue> {
    let segments = segment_text(text, &FixedWidthMeasure::default());
    serialize(&segments, "Failed to serialize segments")
}

fn paint(context: &CanvasRenderingContext2d, list: &DisplayList) -> Result<(), JsValue> {
    context.set_font(&list.font);
    context.set_text_baseline("middle");

    for op in &list.ops {
        match op {
            DrawOp::Clear { width, height, color } => {
                context.clear_rect(0.0, 0.0, *width as f64, *height as f64);
                context.set_fill_style_str(color);
                context.fill_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                context.set_fill_style_str(color);
                context.fill_rect(*x as f64, *y as f64, *width as f64, *height as f64);
            }
            DrawOp::FillText { text, x, y, color } => {
                context.set_fill_style_str(color);
                context.fill_text(text, *x as f64, *y as f64)?;
            }
            DrawOp::Caret { x, y, height, color } => {
                context.set_fill_style_str(color);
                context.fill_rect(*x as f64, *y as f64, CARET_WIDTH, *height as f64);
            }
        }
    }
    Ok(())
}
