//! Site core WASM module
//!
//! Canvas bio editor with link/email highlighting, per-post interaction
//! state, and the waitlist/support API routes. The core modules are plain
//! Rust; `api` holds the wasm-bindgen exports.

pub mod config;
pub mod text;
pub mod editor;
pub mod interactions;
pub mod server;
pub mod api;

// Re-export commonly used types
pub use config::{BioConfig, SiteConfig};
pub use editor::{BioEditor, CanvasSurface, EditorKey, EditorPhase, KeyOutcome};
pub use interactions::{InteractionError, InteractionState, InteractionStore};
pub use server::{ApiRequest, ApiResponse, SiteBackend};
pub use text::{segment_text, Segment, SegmentKind};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();
    log::info!("Site core WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already initialized: {}", e)));
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
