//! Shadow Core - flag-gated migration orchestrator
//!
//! Cuts traffic over from a legacy implementation to a candidate while both
//! run in production:
//! - Resolves three flags per call (migration complete, shadow, return new)
//! - Runs legacy only, candidate only, or both concurrently
//! - Returns the authoritative result without waiting on any comparison
//! - Compares both outcomes structurally in a detached task and logs drift
//!
//! # Example
//!
//! ```rust,ignore
//! use shadow_core::{RequestContext, ShadowConfig, ShadowMigration, Source};
//! use shadow_core::normalize::catalog::product_listing_shape;
//! use shadow_flags::{FlagKeys, InMemoryFlags};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), FetchError> {
//! let config = ShadowConfig::new(
//!     "catalog-products",
//!     FlagKeys::new("catalog-done", "catalog-shadow", "catalog-return-new"),
//! );
//! let migration = ShadowMigration::new(config, product_listing_shape(), Arc::new(InMemoryFlags::new()));
//!
//! let ctx = RequestContext::with_tracing("tenant-a");
//! let outcome = migration
//!     .execute(|| legacy_client.products(), || search_client.products(), &ctx)
//!     .await?;
//!
//! assert_eq!(outcome.source, Source::Legacy);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod migration;
pub mod normalize;
pub mod telemetry;

pub use config::{ShadowConfig, DEFAULT_MAX_LOGGED_DIFFERENCES};
pub use context::{LogLevel, Logger, RequestContext, TracingLogger};
pub use error::{CompareError, ConfigError, TelemetryError};
pub use migration::{ExecutionResult, ShadowMigration, Source};
pub use normalize::{AsJson, CanonicalShape, Normalizer};

// Re-exports for convenience
pub use shadow_diff::{Comparison, DiffKind, DiffLimits, DiffSummary, StructuralDifference};
pub use shadow_flags::{FlagEvaluator, FlagEvaluatorFactory, FlagKeys, FlagSet};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring a shadow migration
    pub use crate::{
        CanonicalShape, ExecutionResult, FlagKeys, Logger, Normalizer, RequestContext,
        ShadowConfig, ShadowMigration, Source,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
