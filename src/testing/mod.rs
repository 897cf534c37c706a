//! Test support: a simulated clock for driving auto-dismiss timers.
//!
//! Pass a [`ManualScheduler`] to [`ToastProvider::new`](crate::provider::ToastProvider::new),
//! keep a clone, and move time forward with [`ManualScheduler::advance`].

pub mod clock;

pub use clock::ManualScheduler;
