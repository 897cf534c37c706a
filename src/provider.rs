//! ToastProvider: explicit owner of a toast manager.
//!
//! Create one per UI scope, hand its [`Toaster`] handles to whatever needs to
//! show toasts, and drop it when the scope goes away. Dropping the provider
//! is the teardown: every pending timer is cancelled, the active set is
//! cleared, and outstanding `Toaster` handles turn into no-ops.

use std::sync::Arc;

use crate::config::ToasterConfig;
use crate::error::{ConfigError, ToastError};
use crate::manager::ToastManager;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::toaster::Toaster;

/// Owns a [`ToastManager`] for the lifetime of a UI scope.
pub struct ToastProvider {
    manager: Arc<ToastManager>,
}

impl ToastProvider {
    /// Create a provider driven by the given scheduler.
    pub fn new(config: ToasterConfig, scheduler: impl Scheduler + 'static) -> Result<Self, ConfigError> {
        let manager = ToastManager::new(config, Arc::new(scheduler))?;
        tracing::debug!(limit = manager.config().limit, "toast provider created");
        Ok(Self { manager })
    }

    /// Create a provider whose timers run on the current tokio runtime.
    pub fn with_tokio(config: ToasterConfig) -> Result<Self, ToastError> {
        let scheduler = TokioScheduler::current()?;
        Ok(Self::new(config, scheduler)?)
    }

    /// A handle for showing and managing toasts.
    pub fn toaster(&self) -> Toaster {
        Toaster::new(Arc::downgrade(&self.manager))
    }

    /// The underlying manager, for renderers that read snapshots directly.
    pub fn manager(&self) -> &Arc<ToastManager> {
        &self.manager
    }
}

impl Drop for ToastProvider {
    fn drop(&mut self) {
        self.manager.shutdown();
    }
}

// ===========================================================================
// Tests
// ===========================================================================
