//! Error types.
//!
//! Only construction can fail. Once a provider exists, every toast operation
//! succeeds: stale ids are ignored and capacity overflow is resolved by
//! eviction.

/// Invalid provider configuration, detected before any toast is shown.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("toast limit must be at least 1")]
    ZeroLimit,

    #[error("toast limit cannot be negative (got {0})")]
    NegativeLimit(i64),

    #[error("toast duration cannot be negative (got {0} ms)")]
    NegativeDuration(i64),

    #[error("unknown duration `{0}`: expected milliseconds or \"persistent\"")]
    UnknownDuration(String),

    #[error("invalid toast configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors surfaced when building a provider or scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ToastError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no tokio runtime is running on this thread")]
    NoRuntime,
}
