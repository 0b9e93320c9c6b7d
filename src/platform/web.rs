//! Browser timers
//!
//! Each armed timer owns its JS closure. A closure may be the one currently
//! running when its timer is stopped (the tick handler re-arms the tick timer on
//! speed-up), so stopped closures are parked in `retired` and only dropped at the
//! start of the next timer callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{Scheduler, TimerKind};

/// Receives every timer firing
pub type Dispatch = Rc<dyn Fn(TimerKind)>;

struct BrowserTimer {
    handle: i32,
    repeating: bool,
    _closure: Closure<dyn FnMut()>,
}

type TimerTable = Rc<RefCell<HashMap<TimerKind, BrowserTimer>>>;
type Retired = Rc<RefCell<Vec<BrowserTimer>>>;

pub struct BrowserScheduler {
    window: web_sys::Window,
    timers: TimerTable,
    retired: Retired,
    dispatch: Dispatch,
}

impl BrowserScheduler {
    pub fn new(window: web_sys::Window, dispatch: Dispatch) -> Self {
        Self {
            window,
            timers: Rc::new(RefCell::new(HashMap::new())),
            retired: Rc::new(RefCell::new(Vec::new())),
            dispatch,
        }
    }

    fn clear_handle(&self, timer: &BrowserTimer) {
        if timer.repeating {
            self.window.clear_interval_with_handle(timer.handle);
        } else {
            self.window.clear_timeout_with_handle(timer.handle);
        }
    }

    fn retire(&self, kind: TimerKind) {
        let removed = self.timers.borrow_mut().remove(&kind);
        if let Some(timer) = removed {
            self.clear_handle(&timer);
            self.retired.borrow_mut().push(timer);
        }
    }

    fn arm(&mut self, kind: TimerKind, ms: u32, repeating: bool) {
        self.retire(kind);

        let dispatch = Rc::clone(&self.dispatch);
        let retired = Rc::clone(&self.retired);
        let table: Weak<RefCell<HashMap<TimerKind, BrowserTimer>>> = Rc::downgrade(&self.timers);
        let closure = Closure::<dyn FnMut()>::new(move || {
            retired.borrow_mut().clear();
            if !repeating {
                // A fired timeout is no longer active
                if let Some(table) = table.upgrade() {
                    let done = table.borrow_mut().remove(&kind);
                    if let Some(timer) = done {
                        retired.borrow_mut().push(timer);
                    }
                }
            }
            dispatch(kind);
        });

        let callback = closure.as_ref().unchecked_ref();
        let handle = if repeating {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(callback, ms as i32)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms as i32)
        };

        match handle {
            Ok(handle) => {
                self.timers.borrow_mut().insert(
                    kind,
                    BrowserTimer {
                        handle,
                        repeating,
                        _closure: closure,
                    },
                );
            }
            Err(e) => log::warn!("Failed to arm {:?} timer: {:?}", kind, e),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn start_repeating(&mut self, kind: TimerKind, period_ms: u32) {
        self.arm(kind, period_ms, true);
    }

    fn start_once(&mut self, kind: TimerKind, delay_ms: u32) {
        self.arm(kind, delay_ms, false);
    }

    fn stop(&mut self, kind: TimerKind) {
        self.retire(kind);
    }

    fn is_active(&self, kind: TimerKind) -> bool {
        self.timers.borrow().contains_key(&kind)
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.borrow_mut().drain() {
            self.clear_handle(&timer);
        }
    }
}
