//! Selection preservation
//!
//! - `store`: the single most recent selection snapshot
//! - `tracker`: turns selection-change events into snapshots and toolbar state

pub mod store;
pub mod tracker;

pub use store::{RangeSnapshotStore, RestoreOutcome};
pub use tracker::SelectionTracker;
