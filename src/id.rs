//! Toast identifiers and the generator used when callers don't supply one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// ---------------------------------------------------------------------------
// ToastId
// ---------------------------------------------------------------------------

/// Identifier of an active toast. Unique within a provider's active set.
///
/// Callers may pick their own (`"upload-progress"`), which makes a second
/// `add` with the same id replace the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(String);

impl ToastId {
    /// Wrap a caller-chosen identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier, distinct from every other generated one
    /// for the lifetime of the process.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("toast-{:x}-{n}", process_stamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ToastId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ToastId> for ToastId {
    fn from(id: &ToastId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for ToastId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Milliseconds since the epoch, captured once per process. Keeps generated
/// ids from different runs apart when they end up persisted in logs.
fn process_stamp() -> u64 {
    static STAMP: OnceLock<u64> = OnceLock::new();
    *STAMP.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(stamp_millis)
            .unwrap_or(0)
    })
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn stamp_millis(since_epoch: Duration) -> u64 {
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}

// ===========================================================================
// Tests
// ===========================================================================
