//! `setTimeout` based save timer

use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::platform_error;
use crate::host::HostResult;
use crate::persistence::{SaveTimer, TimerHandle};

/// Calls `on_elapsed` with the handle of each timer that runs out
pub struct TimeoutTimer {
    window: web_sys::Window,
    on_elapsed: Rc<dyn Fn(TimerHandle)>,
    next_id: u32,
    /// Our handle -> id returned by `setTimeout`
    timeouts: HashMap<TimerHandle, i32>,
}

impl TimeoutTimer {
    pub fn new(window: web_sys::Window, on_elapsed: impl Fn(TimerHandle) + 'static) -> Self {
        Self {
            window,
            on_elapsed: Rc::new(on_elapsed),
            next_id: 0,
            timeouts: HashMap::new(),
        }
    }
}

impl SaveTimer for TimeoutTimer {
    fn schedule(&mut self, delay_ms: u32) -> HostResult<TimerHandle> {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle(self.next_id);

        let on_elapsed = Rc::clone(&self.on_elapsed);
        let callback = Closure::once_into_js(move || on_elapsed(handle));
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .map_err(platform_error)?;

        self.timeouts.insert(handle, id);
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(id) = self.timeouts.remove(&handle) {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn release(&mut self, handle: TimerHandle) {
        self.timeouts.remove(&handle);
    }
}
