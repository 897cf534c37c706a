//! Provider configuration: default toast options and the capacity limit.
//!
//! Built in code with the [`ToasterConfig`] builder, or loaded from TOML:
//!
//! ```toml
//! limit = 3
//!
//! [defaults]
//! position = "top-right"
//! status = "info"
//! variant = "solid"
//! duration = 4000        # milliseconds, or "persistent"
//! closable = true
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::toast::{AutoDismiss, Position, Status, ToastOptions, Variant};

/// Active toasts allowed at once when no limit is configured.
pub const DEFAULT_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// ToasterConfig
// ---------------------------------------------------------------------------

/// Configuration read once when a provider is created.
#[derive(Debug, Clone)]
pub struct ToasterConfig {
    /// Options merged under every request.
    pub defaults: ToastOptions,
    /// Maximum number of active toasts across all positions.
    pub limit: usize,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            defaults: ToastOptions::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ToasterConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default options (builder).
    pub fn with_defaults(mut self, defaults: ToastOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the capacity limit (builder).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Reject configurations that would make every later operation
    /// misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;
        let limit = match raw.limit {
            None => DEFAULT_LIMIT,
            Some(n) if n < 0 => return Err(ConfigError::NegativeLimit(n)),
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::NegativeLimit(n))?,
        };
        let config = Self {
            defaults: raw.defaults.into_options()?,
            limit,
        };
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    limit: Option<i64>,
    #[serde(default)]
    defaults: RawDefaults,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaults {
    position: Option<Position>,
    status: Option<Status>,
    variant: Option<Variant>,
    duration: Option<RawDuration>,
    closable: Option<bool>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(i64),
    Named(String),
}

impl RawDefaults {
    fn into_options(self) -> Result<ToastOptions, ConfigError> {
        let duration = self.duration.map(RawDuration::into_auto_dismiss).transpose()?;
        Ok(ToastOptions {
            position: self.position,
            status: self.status,
            variant: self.variant,
            duration,
            closable: self.closable,
            icon: self.icon,
            ..ToastOptions::default()
        })
    }
}

impl RawDuration {
    fn into_auto_dismiss(self) -> Result<AutoDismiss, ConfigError> {
        match self {
            RawDuration::Millis(ms) if ms < 0 => Err(ConfigError::NegativeDuration(ms)),
            RawDuration::Millis(ms) => Ok(AutoDismiss::After(Duration::from_millis(ms.unsigned_abs()))),
            RawDuration::Named(name) => match name.as_str() {
                "persistent" | "never" => Ok(AutoDismiss::Never),
                _ => Err(ConfigError::UnknownDuration(name)),
            },
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
