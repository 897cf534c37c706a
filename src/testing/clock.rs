//! ManualScheduler: a simulated clock implementing [`Scheduler`].
//!
//! Time only moves when [`ManualScheduler::advance`] is called. Due timers
//! fire in deadline order (ties in scheduling order), each with the clock set
//! to its own deadline, so callbacks that schedule new timers behave exactly
//! as they would against a real clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::id::ToastId;
use crate::scheduler::{Scheduler, TimerCallback, TimerHandle};

new_key_type! {
    /// Slot of a pending timer.
    struct TimerKey;
}

impl TimerKey {
    fn handle(self) -> TimerHandle {
        TimerHandle::new(self.data().as_ffi())
    }

    fn from_handle(handle: TimerHandle) -> Self {
        KeyData::from_ffi(handle.token()).into()
    }
}

struct PendingTimer {
    id: ToastId,
    deadline: Duration,
    seq: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    seq: u64,
    timers: SlotMap<TimerKey, PendingTimer>,
}

impl ClockState {
    /// Take the earliest timer due at or before `target`.
    fn pop_due(&mut self, target: Duration) -> Option<PendingTimer> {
        let key = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(key, _)| key)?;
        self.timers.remove(key)
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// Deterministic scheduler for tests. Clones share the same clock.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use gilt_toast::testing::ManualScheduler;
/// # use gilt_toast::{ToastOptions, ToastProvider, ToasterConfig};
/// # fn main() -> Result<(), gilt_toast::ConfigError> {
/// let clock = ManualScheduler::new();
/// let provider = ToastProvider::new(ToasterConfig::new(), clock.clone())?;
/// let id = provider.toaster().info(ToastOptions::titled("Saved"));
///
/// clock.advance(Duration::from_millis(5001));
/// assert!(!provider.toaster().is_active(&id));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ClockState>>,
}

impl ManualScheduler {
    /// A clock at time zero with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Whether any timer scheduled under `id` is pending.
    pub fn is_scheduled(&self, id: &ToastId) -> bool {
        self.state.lock().timers.values().any(|t| &t.id == id)
    }

    /// Earliest absolute deadline among the timers scheduled under `id`.
    pub fn deadline(&self, id: &ToastId) -> Option<Duration> {
        self.state
            .lock()
            .timers
            .values()
            .filter(|t| &t.id == id)
            .map(|t| t.deadline)
            .min()
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    ///
    /// Callbacks run without the clock locked, so they may schedule or cancel
    /// timers themselves.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let due = {
                let mut state = self.state.lock();
                let due = state.pop_due(target);
                if let Some(timer) = &due {
                    state.now = timer.deadline;
                }
                due
            };
            match due {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.state.lock().now = target;
    }

    /// [`advance`](Self::advance) by whole milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, id: &ToastId, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut state = self.state.lock();
        let seq = state.seq;
        state.seq += 1;
        let deadline = state.now + delay;
        state
            .timers
            .insert(PendingTimer {
                id: id.clone(),
                deadline,
                seq,
                callback,
            })
            .handle()
    }

    fn cancel(&self, handle: TimerHandle) {
        self.state.lock().timers.remove(TimerKey::from_handle(handle));
    }
}

// ===========================================================================
// Tests
// ===========================================================================
