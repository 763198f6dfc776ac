//! Caret and selection geometry

pub mod caret;

pub use caret::resolve_caret_rect;
