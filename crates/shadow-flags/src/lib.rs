//! Shadow Flags
//!
//! The flag-evaluation seam used by shadow migrations. Flags come from an
//! injected [`FlagEvaluatorFactory`] scoped per tenant; nothing here reads
//! ambient global state.
//!
//! # Adapters
//!
//! - [`InMemoryFlags`]: live, mutable flag table for local runs and tests
//! - [`ReadinessGatedFactory`]: serves defaults until startup initialization succeeded
//! - [`CachedFactory`]: reuses per-tenant evaluators through a moka cache
//!
//! # Example
//!
//! ```rust,ignore
//! use shadow_flags::{FlagKeys, FlagSet, InMemoryFlags};
//!
//! let flags = InMemoryFlags::new();
//! flags.set("catalog-shadow", true);
//!
//! let keys = FlagKeys::new("catalog-done", "catalog-shadow", "catalog-return-new");
//! let set = FlagSet::resolve(&flags, "tenant-a", &keys).await;
//! assert!(set.shadow);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cache;
mod error;
mod evaluator;
mod flag_set;
mod memory;
mod readiness;

pub use cache::{CachedFactory, DEFAULT_TTL};
pub use error::FlagError;
pub use evaluator::{DefaultingEvaluator, FlagEvaluator, FlagEvaluatorFactory};
pub use flag_set::{FlagKeys, FlagSet};
pub use memory::InMemoryFlags;
pub use readiness::{FlagReadiness, ReadinessGatedFactory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
