//! Input handling
//!
//! Pointer tracking and the two ray-casting consumers built on it: the spawn
//! pick point and the hover highlight.

pub mod picking;
pub mod pointer;

pub use picking::{pick_point, reference_plane, HoverHighlighter, PointerPicker};
pub use pointer::{screen_to_ndc, PointerButton, PointerState};
