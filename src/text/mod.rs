//! Text core for the bio editor
//!
//! Pure text handling with no knowledge of the canvas or the DOM. The editor
//! layer drives these modules on every edit.
//!
//! ## Modules
//!
//! - `buffer`: length-capped character storage with undo/redo
//! - `cursor`: cursor offset management
//! - `measure`: text width measurement seam
//! - `segment`: URL / email span segmentation
//! - `layout`: line wrapping, hit testing and caret geometry

pub mod buffer;
pub mod cursor;
pub mod layout;
pub mod measure;
pub mod segment;

// Re-exports for convenience
pub use buffer::{BioBuffer, TextEdit, DEFAULT_MAX_LENGTH};
pub use cursor::Cursor;
pub use layout::{layout_segments, CaretPosition, LayoutConfig, LayoutRun, TextLayout};
pub use measure::{FixedWidthMeasure, TextMeasure};
pub use segment::{find_matches, normalize_url, segment_text, LinkKind, LinkMatch, Segment, SegmentKind};
