//! Debounced save scheduling
//!
//! Every edit pushes the pending write back by the configured delay. A timer
//! that fires after being superseded is ignored, so only the last scheduled
//! write ever runs.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::HostResult;

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// One-shot timer service
///
/// When a scheduled timer elapses the owner is expected to call
/// [`SaveDebouncer::fire`] with its handle.
pub trait SaveTimer {
    fn schedule(&mut self, delay_ms: u32) -> HostResult<TimerHandle>;

    fn cancel(&mut self, handle: TimerHandle);

    /// Forget a timer that has elapsed
    fn release(&mut self, _handle: TimerHandle) {}
}

pub struct SaveDebouncer<T> {
    timer: T,
    delay_ms: u32,
    pending: Option<TimerHandle>,
}

impl<T: SaveTimer> SaveDebouncer<T> {
    pub fn new(timer: T, delay_ms: u32) -> Self {
        Self {
            timer,
            delay_ms,
            pending: None,
        }
    }

    /// Note an edit: cancel the pending write and schedule a new one
    pub fn touch(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
        match self.timer.schedule(self.delay_ms) {
            Ok(handle) => self.pending = Some(handle),
            Err(e) => log::warn!("could not schedule save: {}", e),
        }
    }

    /// A timer elapsed; true when it is the current one and the write should run
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        self.timer.release(handle);
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            log::debug!("ignoring superseded save timer {:?}", handle);
            false
        }
    }

    /// A timer elapsed but the write could not run; push it back by the delay
    pub fn defer(&mut self, handle: TimerHandle) -> bool {
        if self.fire(handle) {
            self.touch();
            true
        } else {
            false
        }
    }

    /// Drop the pending write (e.g. because the caller saves right away)
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.timer.cancel(handle);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

#[derive(Debug, Default)]
struct ManualTimerState {
    next_id: u32,
    pending: Vec<(TimerHandle, u32)>,
}

/// Timer that never fires on its own
///
/// Clones share state, so tests can inspect what the editor scheduled and
/// decide when it elapses.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduled timers that were not cancelled, oldest first
    pub fn pending(&self) -> Vec<TimerHandle> {
        self.state.borrow().pending.iter().map(|(h, _)| *h).collect()
    }

    pub fn delay_of(&self, handle: TimerHandle) -> Option<u32> {
        self.state
            .borrow()
            .pending
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, delay)| *delay)
    }

    /// Remove and return every pending timer, as if they all elapsed
    pub fn elapse_all(&self) -> Vec<TimerHandle> {
        self.state
            .borrow_mut()
            .pending
            .drain(..)
            .map(|(h, _)| h)
            .collect()
    }
}

impl SaveTimer for ManualTimer {
    fn schedule(&mut self, delay_ms: u32) -> HostResult<TimerHandle> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = TimerHandle(state.next_id);
        state.pending.push((handle, delay_ms));
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.state.borrow_mut().pending.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_timer_supersedes_older() {
        let timer = ManualTimer::new();
        let mut debouncer = SaveDebouncer::new(timer.clone(), 250);

        debouncer.touch();
        let first = timer.pending()[0];
        debouncer.touch();
        let pending = timer.pending();

        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0], first);
        assert_eq!(timer.delay_of(pending[0]), Some(250));

        assert!(!debouncer.fire(first));
        assert!(debouncer.fire(pending[0]));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel() {
        let timer = ManualTimer::new();
        let mut debouncer = SaveDebouncer::new(timer.clone(), 100);
        assert!(!debouncer.cancel());

        debouncer.touch();
        assert!(debouncer.cancel());
        assert!(timer.pending().is_empty());
    }

    #[test]
    fn test_deferred_timer_is_rescheduled() {
        let timer = ManualTimer::new();
        let mut debouncer = SaveDebouncer::new(timer.clone(), 250);

        debouncer.touch();
        let missed = timer.elapse_all()[0];
        assert!(debouncer.defer(missed));
        assert!(debouncer.is_pending());

        let retry = timer.pending();
        assert_eq!(retry.len(), 1);
        assert_ne!(retry[0], missed);
        assert!(debouncer.fire(retry[0]));

        // A superseded timer is not resurrected
        assert!(!debouncer.defer(missed));
        assert!(!debouncer.is_pending());
    }
}
