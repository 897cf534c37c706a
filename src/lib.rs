//! # gilt-toast
//!
//! Toast notification engine for gilt UIs.
//!
//! gilt-toast decides which notifications exist, for how long, and in which
//! screen stack. Rendering stays with the caller: it reads [`Toast`]
//! snapshots or [`PositionGroups`] and draws them however it likes.
//!
//! ## Core Systems
//!
//! - **[`toast`]** — `Toast` records, `ToastOptions` requests, status/variant/position enums
//! - **[`id`]** — `ToastId` and process-unique id generation
//! - **[`manager`]** — `ToastManager`: upsert, capacity eviction, close routine, change feed
//! - **[`grouping`]** — `PositionGroups`, the active set partitioned by position
//! - **[`scheduler`]** — `Scheduler` trait and the tokio-backed `TokioScheduler`
//! - **[`provider`]** — `ToastProvider`, the explicit owner; dropping it tears everything down
//! - **[`toaster`]** — `Toaster` handles with `info`/`success`/`warning`/`error`/`loading` shorthands
//! - **[`config`]** — `ToasterConfig` builder and TOML loading
//! - **[`testing`]** — `ManualScheduler`, a simulated clock
//!
//! ## Example
//!
//! ```
//! # use std::time::Duration;
//! # use gilt_toast::testing::ManualScheduler;
//! # use gilt_toast::{Status, ToastOptions, ToastProvider, ToasterConfig};
//! # fn main() -> Result<(), gilt_toast::ToastError> {
//! // Use `ToastProvider::with_tokio` inside a tokio runtime.
//! let clock = ManualScheduler::new();
//! let provider = ToastProvider::new(ToasterConfig::new().with_limit(3), clock.clone())?;
//! let toaster = provider.toaster();
//!
//! let id = toaster.loading(ToastOptions::titled("Uploading"));
//! toaster.update(&id, ToastOptions::titled("Uploaded").with_status(Status::Success)
//!     .with_duration(Duration::from_secs(3)));
//!
//! clock.advance(Duration::from_secs(3));
//! assert!(!toaster.is_active(&id));
//! # Ok(())
//! # }
//! ```

// Foundation
pub mod error;
pub mod id;
pub mod toast;

// Configuration
pub mod config;

// Lifecycle
pub mod grouping;
pub mod manager;
pub mod scheduler;

// Public surface
pub mod provider;
pub mod toaster;

// Test support
pub mod testing;

pub use config::ToasterConfig;
pub use error::{ConfigError, ToastError};
pub use grouping::PositionGroups;
pub use id::ToastId;
pub use manager::{ToastManager, ToastSnapshot};
pub use provider::ToastProvider;
pub use scheduler::{Scheduler, TimerCallback, TimerHandle, TokioScheduler};
pub use toast::{AutoDismiss, CloseReason, Position, Status, Toast, ToastAction, ToastOptions, Variant};
pub use toaster::{PromiseMessages, Toaster};
