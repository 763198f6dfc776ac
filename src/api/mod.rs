//! Document Editor WASM API
//!
//! The JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, serialization and error mapping
//! - `word_editor`: the `WordEditor` class bound to one contenteditable element

pub mod helpers;
pub mod word_editor;

pub use word_editor::WordEditor;
