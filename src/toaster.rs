//! Toaster: the handle application code uses to show toasts.
//!
//! Cheap to clone and safe to keep around: it holds only a weak reference to
//! the provider's manager. Once the provider is dropped every operation is a
//! no-op and [`Toaster::add`] still returns an id.
//!
//! The status shorthands ([`Toaster::info`], [`Toaster::success`], ...) only
//! fix `status` and forward to [`Toaster::add`]; defaults, eviction and timers
//! all live in the manager.

use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::sync::watch;

use crate::grouping::PositionGroups;
use crate::id::ToastId;
use crate::manager::{ToastManager, ToastSnapshot};
use crate::toast::{AutoDismiss, Status, ToastOptions};

// ---------------------------------------------------------------------------
// PromiseMessages
// ---------------------------------------------------------------------------

/// Toast content for each stage of [`Toaster::promise`].
#[derive(Debug, Clone, Default)]
pub struct PromiseMessages {
    pub loading: ToastOptions,
    pub success: ToastOptions,
    pub error: ToastOptions,
}

impl PromiseMessages {
    /// Messages with just a title per stage.
    pub fn new(loading: impl Into<String>, success: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            loading: ToastOptions::titled(loading),
            success: ToastOptions::titled(success),
            error: ToastOptions::titled(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Toaster
// ---------------------------------------------------------------------------

/// Handle to a [`ToastProvider`](crate::provider::ToastProvider)'s toasts.
#[derive(Clone)]
pub struct Toaster {
    manager: Weak<ToastManager>,
}

impl Toaster {
    pub(crate) fn new(manager: Weak<ToastManager>) -> Self {
        Self { manager }
    }

    fn manager(&self) -> Option<Arc<ToastManager>> {
        self.manager.upgrade()
    }

    /// Whether the owning provider is still alive.
    pub fn is_attached(&self) -> bool {
        self.manager.strong_count() > 0
    }

    // ── Generic operations ───────────────────────────────────────────

    /// Show a toast. See [`ToastManager::add`].
    pub fn add(&self, options: ToastOptions) -> ToastId {
        match self.manager() {
            Some(manager) => manager.add(options),
            None => {
                let id = options.id.unwrap_or_else(ToastId::generate);
                tracing::warn!(id = %id, "toast added after provider teardown; ignored");
                id
            }
        }
    }

    /// Shallow-merge `patch` into an active toast. Ignored for stale ids.
    pub fn update(&self, id: &ToastId, patch: ToastOptions) {
        if let Some(manager) = self.manager() {
            manager.update(id, patch);
        }
    }

    /// Close a toast through its close callback.
    pub fn close(&self, id: &ToastId) {
        if let Some(manager) = self.manager() {
            manager.close(id);
        }
    }

    /// Remove a toast without running its close callback.
    pub fn remove(&self, id: &ToastId) {
        if let Some(manager) = self.manager() {
            manager.remove(id);
        }
    }

    pub fn remove_all(&self) {
        if let Some(manager) = self.manager() {
            manager.remove_all();
        }
    }

    pub fn is_active(&self, id: &ToastId) -> bool {
        self.manager().is_some_and(|m| m.is_active(id))
    }

    /// Run a toast's action. Returns `false` if there was nothing to run.
    pub fn trigger_action(&self, id: &ToastId) -> bool {
        self.manager().is_some_and(|m| m.trigger_action(id))
    }

    /// The active set, newest first. Empty once detached.
    pub fn toasts(&self) -> ToastSnapshot {
        self.manager()
            .map(|m| m.snapshot())
            .unwrap_or_else(|| ToastSnapshot::from(Vec::new()))
    }

    /// The active set partitioned by position.
    pub fn position_groups(&self) -> PositionGroups {
        PositionGroups::from_toasts(self.toasts().iter())
    }

    /// Change feed of snapshots. `None` once detached.
    pub fn subscribe(&self) -> Option<watch::Receiver<ToastSnapshot>> {
        self.manager().map(|m| m.subscribe())
    }

    // ── Status shorthands ────────────────────────────────────────────

    pub fn info(&self, options: ToastOptions) -> ToastId {
        self.add(options.with_status(Status::Info))
    }

    pub fn success(&self, options: ToastOptions) -> ToastId {
        self.add(options.with_status(Status::Success))
    }

    pub fn warning(&self, options: ToastOptions) -> ToastId {
        self.add(options.with_status(Status::Warning))
    }

    pub fn error(&self, options: ToastOptions) -> ToastId {
        self.add(options.with_status(Status::Error))
    }

    pub fn loading(&self, options: ToastOptions) -> ToastId {
        self.add(options.with_status(Status::Loading))
    }

    // ── Promise tracking ─────────────────────────────────────────────

    /// Show a loading toast while `future` runs, then turn the same toast
    /// into a success or error toast.
    ///
    /// The loading toast is persistent unless `messages.loading` sets a
    /// duration. The settled toast gets the duration from its stage options,
    /// else the provider default, else the built-in one. If the loading
    /// toast was closed or evicted meanwhile, nothing is shown.
    pub async fn promise<F, T, E>(&self, future: F, messages: PromiseMessages) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let PromiseMessages {
            mut loading,
            success,
            error,
        } = messages;
        if loading.duration.is_none() {
            loading.duration = Some(AutoDismiss::Never);
        }
        let id = self.loading(loading);

        let result = future.await;

        let (status, mut settled) = match &result {
            Ok(_) => (Status::Success, success),
            Err(_) => (Status::Error, error),
        };
        if settled.duration.is_none() {
            settled.duration = Some(self.default_duration());
        }
        self.update(&id, settled.with_status(status));
        result
    }

    fn default_duration(&self) -> AutoDismiss {
        self.manager()
            .and_then(|m| m.config().defaults.duration)
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("attached", &self.is_attached())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
