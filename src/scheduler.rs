//! Auto-dismiss scheduling.
//!
//! The manager never touches a timer primitive directly. It asks a
//! [`Scheduler`] for a single-shot timer, keeps the returned [`TimerHandle`]
//! on the toast's entry, and cancels through that handle on every path that
//! removes or replaces the toast. Handles belong to whoever scheduled them,
//! so several managers can share one scheduler without touching each other's
//! timers, even when they use the same toast ids.
//!
//! - [`TokioScheduler`] — one `tokio::time::sleep` task per timer.
//! - [`ManualScheduler`](crate::testing::ManualScheduler) — simulated clock
//!   for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::ToastError;
use crate::id::ToastId;

/// Work run when a timer expires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque reference to one scheduled timer, unique within its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a scheduler-chosen token.
    pub fn new(token: u64) -> Self {
        Self(token)
    }

    pub fn token(self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Scheduler trait
// ---------------------------------------------------------------------------

/// Single-shot timers, cancelled by the handle `schedule_once` returned.
///
/// The toast id is passed for diagnostics only; timers for equal ids are
/// independent. Implementations must not invoke callbacks from inside
/// `schedule_once` or `cancel`; the manager calls these while holding its
/// own lock.
pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`, unless cancelled first.
    fn schedule_once(&self, id: &ToastId, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel one timer. No-op when it already fired or was cancelled.
    fn cancel(&self, handle: TimerHandle);
}

// ---------------------------------------------------------------------------
// TokioScheduler
// ---------------------------------------------------------------------------

/// Scheduler backed by tasks spawned on a tokio runtime.
///
/// Dropping the scheduler aborts every pending timer.
pub struct TokioScheduler {
    handle: Handle,
    timers: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
    next_token: AtomicU64,
}

impl TokioScheduler {
    /// Spawn timers on the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            timers: Arc::new(Mutex::new(HashMap::new())),
            next_token: AtomicU64::new(0),
        }
    }

    /// Spawn timers on the runtime driving the current thread.
    pub fn current() -> Result<Self, ToastError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| ToastError::NoRuntime)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.lock().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, id: &ToastId, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);

        // Held across the spawn so the task can't observe the map before its
        // own entry is in it.
        let mut pending = self.timers.lock();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let current = timers.lock().remove(&token).is_some();
            if current {
                callback();
            }
        });
        pending.insert(token, task);
        tracing::trace!(id = %id, token, ?delay, "timer scheduled");
        TimerHandle(token)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.timers.lock().remove(&handle.0) {
            task.abort();
            tracing::trace!(token = handle.0, "timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.timers.lock().drain() {
            task.abort();
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
