//! Persisted document record
//!
//! Stored as a single JSON object `{ "title": ..., "html": ... }`. There is no
//! version field: anything that does not match this shape is treated as absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentRecord {
    pub title: String,

    /// Serialized markup of the editable surface
    #[serde(rename = "html")]
    pub body_markup: String,
}

impl DocumentRecord {
    pub fn new(title: impl Into<String>, body_markup: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_markup: body_markup.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
