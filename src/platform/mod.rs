//! Platform abstraction layer
//!
//! Timers are the only platform service the session needs. Everything runs on
//! one thread and every timer fires into `Session::on_timer`.
//!
//! - `ManualScheduler`: virtual clock for tests and the headless demo
//! - `BrowserScheduler`: `setInterval`/`setTimeout` (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::BrowserScheduler;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The timers a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Simulation tick loop
    Tick,
    /// 1 s display clock
    Clock,
    /// Special food spawn attempt
    SpecialSpawn,
    /// One-shot removal of the current special food
    SpecialExpiry,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Tick,
        TimerKind::Clock,
        TimerKind::SpecialSpawn,
        TimerKind::SpecialExpiry,
    ];
}

/// Timer service injected into the session
///
/// Starting a timer replaces any running timer of the same kind. Stopping is
/// idempotent.
pub trait Scheduler {
    /// Milliseconds on this scheduler's clock
    fn now_ms(&self) -> f64;

    fn start_repeating(&mut self, kind: TimerKind, period_ms: u32);

    fn start_once(&mut self, kind: TimerKind, delay_ms: u32);

    fn stop(&mut self, kind: TimerKind);

    fn is_active(&self, kind: TimerKind) -> bool;

    fn stop_all(&mut self) {
        for kind in TimerKind::ALL {
            self.stop(kind);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ManualTimer {
    due_ms: f64,
    period_ms: Option<u32>,
    /// Arm order; breaks ties between timers due at the same instant
    seq: u64,
}

/// Deterministic virtual clock
///
/// Nothing fires on its own: the owner pulls due timers with `fire_next` and
/// dispatches them itself.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: f64,
    timers: BTreeMap<TimerKind, ManualTimer>,
    next_seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn arm(&mut self, kind: TimerKind, delay_ms: u32, period_ms: Option<u32>) {
        self.next_seq += 1;
        self.timers.insert(
            kind,
            ManualTimer {
                due_ms: self.now_ms + delay_ms as f64,
                period_ms,
                seq: self.next_seq,
            },
        );
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to it
    pub fn fire_next(&mut self, until_ms: f64) -> Option<TimerKind> {
        let (kind, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(k, t)| (*k, *t))?;

        self.now_ms = self.now_ms.max(timer.due_ms);
        match timer.period_ms {
            Some(period) => {
                self.next_seq += 1;
                self.timers.insert(
                    kind,
                    ManualTimer {
                        due_ms: timer.due_ms + period.max(1) as f64,
                        period_ms: timer.period_ms,
                        seq: self.next_seq,
                    },
                );
            }
            None => {
                self.timers.remove(&kind);
            }
        }
        Some(kind)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: f64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// When `kind` fires next, if armed
    pub fn due_at(&self, kind: TimerKind) -> Option<f64> {
        self.timers.get(&kind).map(|t| t.due_ms)
    }

    pub fn period_of(&self, kind: TimerKind) -> Option<u32> {
        self.timers.get(&kind).and_then(|t| t.period_ms)
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn start_repeating(&mut self, kind: TimerKind, period_ms: u32) {
        self.arm(kind, period_ms, Some(period_ms));
    }

    fn start_once(&mut self, kind: TimerKind, delay_ms: u32) {
        self.arm(kind, delay_ms, None);
    }

    fn stop(&mut self, kind: TimerKind) {
        self.timers.remove(&kind);
    }

    fn is_active(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }
}
