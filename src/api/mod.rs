//! WASM API
//!
//! JavaScript-facing wrappers over the core modules.
//!
//! # Module Structure
//!
//! - `helpers`: Shared serialization and error conversion
//! - `bio_input`: Canvas bio editor (`BioInput`, `segmentText`)
//! - `interactions`: localStorage-backed post interactions (`PostInteractions`)
//! - `backend`: Waitlist and support routes for the serverless host

pub mod helpers;
pub mod bio_input;
pub mod interactions;
pub mod backend;

pub use bio_input::{segment_text_js, BioInput};
pub use interactions::{LocalStorage, PostInteractions};
pub use backend::{handle_api_request, init_site_backend, set_mail_transport, JsMailer};
