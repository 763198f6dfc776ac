//! Data models for the document editor
//!
//! Formatting vocabulary, the persisted record, geometry and configuration.

pub mod config;
pub mod geometry;
pub mod record;
pub mod style;

// Re-export commonly used types
pub use config::EditorConfig;
pub use geometry::CaretRect;
pub use record::DocumentRecord;
pub use style::{
    ActiveFormatState, BlockTag, FormatKind, InlineStyle, StyleProperty, ZERO_WIDTH_CHAR,
    ZERO_WIDTH_SPACE,
};
