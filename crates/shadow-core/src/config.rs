//! Migration configuration
//!
//! One [`ShadowConfig`] per migrated read path. Usually embedded in the
//! service's TOML configuration:
//!
//! ```toml
//! name = "catalog-products"
//! max_logged_differences = 20
//!
//! [flags]
//! migration_complete = "catalog-products-migration-complete"
//! shadow = "catalog-products-shadow"
//! return_new = "catalog-products-return-new"
//!
//! [limits]
//! max_depth = 10
//! max_array_elements = 10
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use shadow_diff::DiffLimits;
use shadow_flags::FlagKeys;
use std::collections::HashSet;

/// Default number of raw differences included in one log entry
pub const DEFAULT_MAX_LOGGED_DIFFERENCES: usize = 20;

/// Configuration for one shadow migration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowConfig {
    /// Migration name used in every log message
    pub name: String,
    /// Flag keys driving the migration
    pub flags: FlagKeys,
    /// Raw differences included in a drift log entry
    #[serde(default = "default_max_logged_differences")]
    pub max_logged_differences: usize,
    /// Differ traversal bounds
    #[serde(default)]
    pub limits: DiffLimits,
}

fn default_max_logged_differences() -> usize {
    DEFAULT_MAX_LOGGED_DIFFERENCES
}

impl ShadowConfig {
    /// Create configuration with default bounds
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, flags: FlagKeys) -> Self {
        Self {
            name: name.into(),
            flags,
            max_logged_differences: DEFAULT_MAX_LOGGED_DIFFERENCES,
            limits: DiffLimits::default(),
        }
    }

    /// With log payload bound
    #[inline]
    #[must_use]
    pub fn with_max_logged_differences(mut self, max: usize) -> Self {
        self.max_logged_differences = max;
        self
    }

    /// With differ traversal bounds
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: DiffLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse and validate TOML configuration
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed TOML or missing fields
    /// - `ConfigError::Invalid` if validation fails
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` for an empty name, empty or duplicate
    /// flag keys, or zero bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("migration name is empty".into()));
        }

        let mut seen = HashSet::new();
        for key in self.flags.iter() {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "migration '{}' has an empty flag key",
                    self.name
                )));
            }
            if !seen.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "migration '{}' reuses flag key '{key}'",
                    self.name
                )));
            }
        }

        if self.max_logged_differences == 0 {
            return Err(ConfigError::Invalid(
                "max_logged_differences must be at least 1".into(),
            ));
        }
        if self.limits.max_array_elements == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_array_elements must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
