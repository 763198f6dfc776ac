//! Local persistence of the document record
//!
//! - `storage`: key-value storage abstraction and the in-memory store
//! - `bridge`: load/save of the `{title, html}` record under one key
//! - `debounce`: save scheduling (only the last scheduled write runs)

pub mod bridge;
pub mod debounce;
pub mod storage;

pub use bridge::PersistenceBridge;
pub use debounce::{ManualTimer, SaveDebouncer, SaveTimer, TimerHandle};
pub use storage::{KeyValueStorage, MemoryStorage};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// The storage backend refused the read or write (quota, privacy mode)
    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("failed to encode document: {0}")]
    Encode(String),
}
