use std::time::Duration;

use foundation::time::Time;
use mapview::SequencerTask;
use runtime::{Scheduler, TimerId};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::js;

/// `setTimeout`-backed scheduler. Fired tasks re-enter through
/// [`crate::fire_task`].
pub struct BrowserScheduler {
    origin_ms: f64,
    next_id: u64,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self {
            origin_ms: now_ms(),
            next_id: 0,
        }
    }
}

impl Default for BrowserScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

impl Scheduler<SequencerTask> for BrowserScheduler {
    fn now(&self) -> Time {
        Time((now_ms() - self.origin_ms).max(0.0) as u64)
    }

    fn schedule_after(&mut self, delay: Duration, task: SequencerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let callback = Closure::once_into_js(move || crate::fire_task(task));
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match web_sys::window() {
            Some(window) => {
                if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    delay_ms,
                ) {
                    js::error(&format!("setTimeout failed: {}", js::describe(&err)));
                }
            }
            None => js::error("no window; deferred map task dropped"),
        }
        id
    }
}
