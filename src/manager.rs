//! ToastManager: the single owner of the active toast collection.
//!
//! Every mutation (`add`, `update`, `remove`, `remove_all`, eviction and
//! timer expiry) runs under one lock and finishes before it is released.
//! Caller callbacks (`on_close`, actions) and timer callbacks never run while
//! that lock is held, so they are free to call back into the manager.
//!
//! Removal goes through one routine that cancels the toast's timer by the
//! handle the scheduler returned for it and drops the entry. The manager
//! only ever cancels its own handles, so managers sharing a scheduler stay
//! independent. Timers also carry the generation they were armed with; a
//! timer whose generation no longer matches its entry (because the toast was
//! upserted, re-timed or removed) is ignored even if it still fires.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::ToasterConfig;
use crate::error::ConfigError;
use crate::grouping::PositionGroups;
use crate::id::ToastId;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::toast::{CloseReason, Toast, ToastOptions};

/// Immutable view of the active set, newest first.
pub type ToastSnapshot = Arc<[Toast]>;

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Armed {
    generation: u64,
    handle: TimerHandle,
}

struct Entry {
    toast: Toast,
    /// Distinguishes this entry from a later upsert under the same id.
    instance: u64,
    /// The live timer, if one is armed.
    timer: Option<Armed>,
    /// Set once the close routine has claimed this entry.
    closing: bool,
}

#[derive(Default)]
struct State {
    /// Newest first.
    entries: VecDeque<Entry>,
    next_serial: u64,
    shut_down: bool,
}

impl State {
    fn serial(&mut self) -> u64 {
        self.next_serial += 1;
        self.next_serial
    }

    fn index_of(&self, id: &ToastId) -> Option<usize> {
        self.entries.iter().position(|e| e.toast.id == *id)
    }

    fn find_mut(&mut self, id: &ToastId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.toast.id == *id)
    }

    /// Take every entry, oldest last.
    fn drain(&mut self) -> Vec<Entry> {
        self.entries.drain(..).collect()
    }

    fn snapshot(&self) -> ToastSnapshot {
        self.entries.iter().map(|e| e.toast.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// ToastManager
// ---------------------------------------------------------------------------

/// Owns the active toasts: upsert, capacity eviction, auto-dismiss timers.
///
/// Usually reached through a [`ToastProvider`](crate::provider::ToastProvider)
/// and its [`Toaster`](crate::toaster::Toaster) handles.
pub struct ToastManager {
    config: ToasterConfig,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<State>,
    feed: watch::Sender<ToastSnapshot>,
}

impl ToastManager {
    /// Create a manager. Fails if the configuration is invalid.
    pub fn new(config: ToasterConfig, scheduler: Arc<dyn Scheduler>) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        let (feed, _) = watch::channel(ToastSnapshot::from(Vec::new()));
        Ok(Arc::new(Self {
            config,
            scheduler,
            state: Mutex::new(State::default()),
            feed,
        }))
    }

    pub fn config(&self) -> &ToasterConfig {
        &self.config
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Show a toast and return its id.
    ///
    /// An existing toast with the same id is replaced and the new one moves
    /// to the front. If the collection then exceeds the limit, the oldest
    /// toasts are removed until it fits. Always returns a usable id, even
    /// after shutdown (the toast is then simply not shown).
    pub fn add(self: &Arc<Self>, options: ToastOptions) -> ToastId {
        let id = options.id.clone().unwrap_or_else(ToastId::generate);
        let mut state = self.state.lock();
        if state.shut_down {
            tracing::warn!(id = %id, "toast added after shutdown; ignored");
            return id;
        }

        let toast = Toast::resolve(id.clone(), options, &self.config.defaults);
        let replaced = self.detach(&mut state, &id).is_some();

        let instance = state.serial();
        let timer = toast.duration.delay().map(|delay| {
            let generation = state.serial();
            self.arm(&id, generation, delay)
        });
        tracing::debug!(
            id = %id,
            status = ?toast.status,
            position = %toast.position,
            replaced,
            "toast added"
        );
        state.entries.push_front(Entry {
            toast,
            instance,
            timer,
            closing: false,
        });

        while state.entries.len() > self.config.limit {
            let Some(oldest) = state.entries.back().map(|e| e.toast.id.clone()) else {
                break;
            };
            self.detach(&mut state, &oldest);
            tracing::debug!(id = %oldest, limit = self.config.limit, "toast evicted");
        }

        self.publish(&state);
        id
    }

    /// Shallow-merge `patch` into the toast with this id.
    ///
    /// A stale id is ignored. When the patch sets a duration the running
    /// timer is cancelled and, unless the new duration is persistent,
    /// replaced by a fresh one.
    pub fn update(self: &Arc<Self>, id: &ToastId, patch: ToastOptions) {
        let mut state = self.state.lock();
        let Some(index) = state.index_of(id) else {
            tracing::trace!(id = %id, "update for inactive toast ignored");
            return;
        };

        let retimed = state.entries[index].toast.apply(patch);
        if retimed {
            let generation = state.serial();
            let entry = &mut state.entries[index];
            self.disarm(entry);
            entry.timer = entry
                .toast
                .duration
                .delay()
                .map(|delay| self.arm(id, generation, delay));
        }
        tracing::debug!(id = %id, "toast updated");
        self.publish(&state);
    }

    /// Remove a toast without running its close callback. Idempotent.
    pub fn remove(&self, id: &ToastId) {
        let mut state = self.state.lock();
        if self.detach(&mut state, id).is_some() {
            tracing::debug!(id = %id, "toast removed");
            self.publish(&state);
        }
    }

    /// Remove every toast and cancel their timers.
    pub fn remove_all(&self) {
        let mut state = self.state.lock();
        let count = self.discard_all(&mut state);
        tracing::debug!(count, "all toasts removed");
        self.publish(&state);
    }

    /// Close a toast: run its latest close callback, then remove it.
    ///
    /// Happens at most once per toast; repeated or concurrent closes are
    /// no-ops. The toast is still active while its callback runs.
    pub fn close(&self, id: &ToastId) {
        self.close_with(id, CloseReason::Dismissed, None);
    }

    /// Teardown: cancel this manager's timers, drop all toasts, ignore later adds.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        let count = self.discard_all(&mut state);
        tracing::debug!(count, "toast manager shut down");
        self.publish(&state);
    }

    /// Run the action attached to a toast. Returns `false` when the toast is
    /// inactive or has no action.
    pub fn trigger_action(&self, id: &ToastId) -> bool {
        let action = {
            let state = self.state.lock();
            state
                .entries
                .iter()
                .find(|e| e.toast.id == *id)
                .and_then(|e| e.toast.action.clone())
        };
        match action {
            Some(action) => {
                action.trigger(id);
                true
            }
            None => false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self, id: &ToastId) -> bool {
        self.state.lock().index_of(id).is_some()
    }

    /// Snapshot of one toast.
    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        let state = self.state.lock();
        state.index_of(id).map(|i| state.entries[i].toast.clone())
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }

    /// The active set, newest first.
    pub fn snapshot(&self) -> ToastSnapshot {
        self.feed.borrow().clone()
    }

    /// The active set partitioned by position.
    pub fn position_groups(&self) -> PositionGroups {
        PositionGroups::from_toasts(self.snapshot().iter())
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<ToastSnapshot> {
        self.feed.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// The one removal routine: cancel the timer, drop the entry.
    fn detach(&self, state: &mut State, id: &ToastId) -> Option<Entry> {
        let index = state.index_of(id)?;
        let mut entry = state.entries.remove(index)?;
        self.disarm(&mut entry);
        Some(entry)
    }

    /// Detach every entry. Returns how many there were.
    fn discard_all(&self, state: &mut State) -> usize {
        let mut entries = state.drain();
        for entry in &mut entries {
            self.disarm(entry);
        }
        entries.len()
    }

    fn disarm(&self, entry: &mut Entry) {
        if let Some(armed) = entry.timer.take() {
            self.scheduler.cancel(armed.handle);
        }
    }

    fn arm(self: &Arc<Self>, id: &ToastId, generation: u64, delay: Duration) -> Armed {
        let manager: Weak<Self> = Arc::downgrade(self);
        let target = id.clone();
        let handle = self.scheduler.schedule_once(
            id,
            delay,
            Box::new(move || {
                if let Some(manager) = manager.upgrade() {
                    manager.close_with(&target, CloseReason::TimedOut, Some(generation));
                }
            }),
        );
        Armed { generation, handle }
    }

    fn close_with(&self, id: &ToastId, reason: CloseReason, generation: Option<u64>) {
        let (instance, callback) = {
            let mut state = self.state.lock();
            let Some(entry) = state.find_mut(id) else {
                return;
            };
            if entry.closing {
                return;
            }
            if let Some(generation) = generation {
                if entry.timer.map(|t| t.generation) != Some(generation) {
                    tracing::trace!(id = %id, "stale timer ignored");
                    return;
                }
                entry.timer = None;
            }
            entry.closing = true;
            (entry.instance, entry.toast.on_close.clone())
        };

        if let Some(callback) = callback {
            callback(id, reason);
        }

        let mut state = self.state.lock();
        let still_ours = state
            .index_of(id)
            .is_some_and(|i| state.entries[i].instance == instance);
        if still_ours {
            self.detach(&mut state, id);
            tracing::debug!(id = %id, ?reason, "toast closed");
            self.publish(&state);
        }
    }

    fn publish(&self, state: &State) {
        self.feed.send_replace(state.snapshot());
    }
}

impl Drop for ToastManager {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for entry in &mut state.entries {
            if let Some(armed) = entry.timer.take() {
                self.scheduler.cancel(armed.handle);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
