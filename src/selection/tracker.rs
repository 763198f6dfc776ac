//! Selection tracker
//!
//! Fed by pointer-up and key-up events on the surface. Each accepted change
//! refreshes the B / I / U state and replaces the snapshot.

use crate::host::EditHost;
use crate::models::ActiveFormatState;
use crate::selection::RangeSnapshotStore;

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    active: ActiveFormatState,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a user-driven selection change
    ///
    /// Returns true when the change was inside the surface and has been
    /// captured.
    pub fn on_selection_change<H: EditHost>(
        &mut self,
        host: &H,
        store: &mut RangeSnapshotStore<H::Node>,
    ) -> bool {
        let range = match host.current_range() {
            Some(range) => range,
            None => return false,
        };
        if !host.range_in_surface(&range) {
            log::debug!("ignoring selection change outside the editor surface");
            return false;
        }

        self.active = host.query_formats();
        store.capture(host)
    }

    /// Re-read the toolbar state from the live selection
    pub fn refresh<H: EditHost>(&mut self, host: &H) -> ActiveFormatState {
        self.active = host.query_formats();
        self.active
    }

    pub fn active(&self) -> ActiveFormatState {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    #[test]
    fn test_change_inside_surface_is_captured() {
        let mut surface = Surface::with_markup("<p><b>bold</b> plain</p>").unwrap();
        let bold = surface.find_text("bold").unwrap();
        surface.select_text(bold, 0, 4).unwrap();

        let mut tracker = SelectionTracker::new();
        let mut store = RangeSnapshotStore::new();
        assert!(tracker.on_selection_change(&surface, &mut store));
        assert!(tracker.active().bold);
        assert!(store.snapshot().is_some());
    }

    #[test]
    fn test_change_outside_surface_is_ignored() {
        let mut surface = Surface::with_markup("<p><i>text</i></p>").unwrap();
        let text = surface.find_text("text").unwrap();
        surface.select_text(text, 0, 4).unwrap();

        let mut tracker = SelectionTracker::new();
        let mut store = RangeSnapshotStore::new();
        tracker.on_selection_change(&surface, &mut store);
        let before = store.snapshot().cloned();

        surface.click_outside();
        assert!(!tracker.on_selection_change(&surface, &mut store));
        assert_eq!(store.snapshot().cloned(), before);
        assert!(tracker.active().italic);
    }

    #[test]
    fn test_zero_ranges_are_ignored() {
        let mut surface = Surface::with_markup("<p>text</p>").unwrap();
        let text = surface.find_text("text").unwrap();
        surface.select_text(text, 1, 2).unwrap();

        let mut tracker = SelectionTracker::new();
        let mut store = RangeSnapshotStore::new();
        tracker.on_selection_change(&surface, &mut store);

        surface.clear_selection();
        assert!(!tracker.on_selection_change(&surface, &mut store));
        assert!(store.snapshot().is_some());
    }
}
