//! Editor configuration
//!
//! Passed from JavaScript as an options object; every field has a default so
//! `new WordEditor(el)` and `new WordEditor(el, { saveDebounceMs: 500 })` both work.

use serde::{Deserialize, Serialize};

use super::record::DocumentRecord;

pub const DEFAULT_STORAGE_KEY: &str = "doc-editor.document";
pub const DEFAULT_SAVE_DEBOUNCE_MS: u32 = 250;
pub const DEFAULT_TITLE: &str = "Untitled document";
pub const DEFAULT_STARTER_HTML: &str = "<p><br/></p>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Fixed local-storage key holding the document record
    pub storage_key: String,

    /// Quiet period before a pending save is written
    pub save_debounce_ms: u32,

    /// Title used when nothing (valid) is stored yet
    pub starter_title: String,

    /// Body markup used when nothing (valid) is stored yet
    pub starter_html: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            starter_title: DEFAULT_TITLE.to_string(),
            starter_html: DEFAULT_STARTER_HTML.to_string(),
        }
    }
}

impl EditorConfig {
    /// The starter document shown on first load
    pub fn starter_record(&self) -> DocumentRecord {
        DocumentRecord::new(self.starter_title.clone(), self.starter_html.clone())
    }
}
