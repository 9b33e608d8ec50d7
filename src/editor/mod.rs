//! Bio editor: input controller and canvas surface
//!
//! The controller owns the buffer, cursor and derived segments/layout; the
//! surface turns that state into draw operations for a canvas.

pub mod controller;
pub mod surface;

pub use controller::{BioEditor, EditorKey, EditorPhase, KeyOutcome};
pub use surface::{caret_visible, CanvasDimensions, CanvasSurface, DisplayList, DrawOp};
