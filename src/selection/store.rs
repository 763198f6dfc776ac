//! Range snapshot store
//!
//! Toolbar controls steal the browser selection as soon as they are clicked.
//! The store keeps the last selection seen inside the surface so the
//! applicator can put it back before mutating anything.

use std::fmt;

use crate::host::{EditHost, HostRange};

/// Result of [`RangeSnapshotStore::restore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    /// Nothing has been captured yet
    NoSnapshot,
    /// The snapshot points at nodes that left the surface
    SelectionLost,
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored)
    }
}

/// Holds at most one selection snapshot; a new capture discards the old one
#[derive(Debug, Clone)]
pub struct RangeSnapshotStore<N> {
    snapshot: Option<HostRange<N>>,
}

impl<N> Default for RangeSnapshotStore<N> {
    fn default() -> Self {
        Self { snapshot: None }
    }
}

impl<N: Clone + PartialEq + fmt::Debug> RangeSnapshotStore<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the live selection, collapsed or not
    ///
    /// Returns false (keeping the previous snapshot) when the host reports no
    /// range at all.
    pub fn capture<H>(&mut self, host: &H) -> bool
    where
        H: EditHost<Node = N>,
    {
        match host.current_range() {
            Some(range) => {
                self.snapshot = Some(range);
                true
            }
            None => false,
        }
    }

    /// Put the snapshot back as the live selection and focus the surface
    pub fn restore<H>(&self, host: &mut H) -> RestoreOutcome
    where
        H: EditHost<Node = N>,
    {
        let range = match &self.snapshot {
            Some(range) => range,
            None => return RestoreOutcome::NoSnapshot,
        };

        if !host.in_surface(&range.start.node) || !host.in_surface(&range.end.node) {
            log::debug!("selection lost: snapshot nodes are no longer in the surface");
            return RestoreOutcome::SelectionLost;
        }

        // Focusing may move the caret, so it has to happen before the range is set
        if let Err(e) = host.focus_surface() {
            log::debug!("could not focus surface: {}", e);
        }
        match host.set_current_range(range) {
            Ok(()) => RestoreOutcome::Restored,
            Err(e) => {
                log::debug!("selection lost: {}", e);
                RestoreOutcome::SelectionLost
            }
        }
    }

    pub fn snapshot(&self) -> Option<&HostRange<N>> {
        self.snapshot.as_ref()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }
}
