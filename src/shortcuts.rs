//! Keyboard shortcuts
//!
//! Ctrl (or Cmd on macOS) + B / I / U toggle bold, italic and underline while
//! the editor surface has focus.

use serde::{Deserialize, Serialize};

use crate::models::FormatKind;

/// The parts of a `keydown` event the editor looks at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyChord {
    pub key: String,
    #[serde(rename = "ctrlKey")]
    pub ctrl: bool,
    #[serde(rename = "metaKey")]
    pub meta: bool,
    #[serde(rename = "shiftKey")]
    pub shift: bool,
    #[serde(rename = "altKey")]
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on Windows/Linux, Cmd on macOS
    pub fn has_primary_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Format toggled by a chord, if any
pub fn format_for_chord(chord: &KeyChord) -> Option<FormatKind> {
    if !chord.has_primary_modifier() || chord.alt {
        return None;
    }
    match chord.key.to_ascii_lowercase().as_str() {
        "b" => Some(FormatKind::Bold),
        "i" => Some(FormatKind::Italic),
        "u" => Some(FormatKind::Underline),
        _ => None,
    }
}
