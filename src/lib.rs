//! Document Editor WASM Module
//!
//! Selection-preserving rich-text formatting for a contenteditable page.
//! Toolbar controls never take focus; every action restores the last
//! selection seen in the editor, mutates the live tree and schedules a
//! debounced save to local storage.
//!
//! The engine is generic over [`host::EditHost`]. [`web::DomHost`] drives the
//! browser DOM; [`surface::Surface`] is an in-memory host used headless and in
//! tests.

pub mod api;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod host;
pub mod models;
pub mod persistence;
pub mod selection;
pub mod shortcuts;
pub mod surface;
pub mod web;

// Re-export commonly used types
pub use api::WordEditor;
pub use editor::Editor;
pub use format::{FormatOutcome, FormattingApplicator, SkipReason};
pub use geometry::resolve_caret_rect;
pub use host::{Boundary, EditHost, HostError, HostRange, HostResult};
pub use models::{
    ActiveFormatState, BlockTag, CaretRect, DocumentRecord, EditorConfig, FormatKind,
    InlineStyle, StyleProperty, ZERO_WIDTH_CHAR, ZERO_WIDTH_SPACE,
};
pub use persistence::{
    KeyValueStorage, ManualTimer, MemoryStorage, PersistenceBridge, PersistenceError,
    SaveDebouncer, SaveTimer, TimerHandle,
};
pub use selection::{RangeSnapshotStore, RestoreOutcome, SelectionTracker};
pub use shortcuts::{format_for_chord, KeyChord};
pub use surface::Surface;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Document editor WASM module initialized");
}
