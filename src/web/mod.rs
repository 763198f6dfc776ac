//! Browser implementations of the host, storage and timer seams
//!
//! - `dom_host`: contenteditable element driven through `Selection`/`Range`
//! - `storage`: `window.localStorage`
//! - `timer`: `setTimeout`/`clearTimeout`

pub mod dom_host;
pub mod storage;
pub mod timer;

pub use dom_host::DomHost;
pub use storage::LocalStorage;
pub use timer::TimeoutTimer;

use wasm_bindgen::{JsCast, JsValue};

use crate::host::HostError;

/// Turn a thrown JS value into a host error
pub(crate) fn platform_error(value: JsValue) -> HostError {
    let message = match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    };
    HostError::Platform(message)
}
