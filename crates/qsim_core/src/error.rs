//! Error types shared by the kernel.

use thiserror::Error;

/// Failures while reading or interpreting the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration key {section}.{key}")]
    MissingKey { section: String, key: String },
    #[error("malformed value {value:?} for {section}.{key}: expected {expected}")]
    Malformed {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Kernel error. Everything here is fatal for the run that raised it.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Popping with no pending events of any kind.
    #[error("no events in queue")]
    EmptyQueue,
    #[error("invalid configuration for center {center}: {reason}")]
    InvalidCenter { center: String, reason: String },
}

impl SimError {
    pub(crate) fn invalid_center(center: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCenter {
            center: center.into(),
            reason: reason.into(),
        }
    }
}
