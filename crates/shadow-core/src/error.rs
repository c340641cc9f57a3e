//! Error types for Shadow Core
//!
//! None of these reach the caller of
//! [`ShadowMigration::execute`](crate::ShadowMigration::execute):
//! - Comparison failures stay inside the detached comparison task
//! - Configuration errors surface while loading configuration
//! - Telemetry errors surface while installing the tracing subscriber

/// Failure while normalizing or comparing two outcomes
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Normalizer rejected a value
    #[error("normalization failed: {0}")]
    Normalize(String),

    /// Report payload could not be encoded
    #[error("report encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Normalizer, differ or logger panicked
    #[error("comparison panicked: {0}")]
    Panicked(String),
}

impl CompareError {
    /// Create normalization error
    #[inline]
    pub fn normalize(message: impl Into<String>) -> Self {
        Self::Normalize(message.into())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but is unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Tracing subscriber could not be installed
#[derive(Debug, thiserror::Error)]
#[error("tracing initialization failed: {0}")]
pub struct TelemetryError(pub String);
