//! Structural Differ
//!
//! Compares two JSON-like values by *shape*, not by content:
//! - Keys present on one side only
//! - Arrays whose lengths disagree
//! - Values present on one side and empty/absent on the other
//! - Values whose coarse type changed
//!
//! Leaf content is never compared: `"red"` and `"blue"` are structurally
//! equal. Traversal is bounded by [`DiffLimits`] so that deeply nested or very
//! long payloads cost a fixed amount of work.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use shadow_diff::{structural_compare, DiffKind, SummaryCategory};
//!
//! let comparison = structural_compare(&json!({"a": 1, "b": 2}), &json!({"a": 1}));
//!
//! assert_eq!(comparison.diffs.len(), 1);
//! assert_eq!(comparison.diffs[0].path, "b");
//! assert_eq!(comparison.diffs[0].kind, DiffKind::MissingKey);
//! assert!(comparison.summary.contains(SummaryCategory::LegacyHasMore));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod compare;
mod difference;
mod path;
mod summary;

pub use compare::{
    structural_compare, structural_compare_with, Comparison, DiffLimits, Shape,
    MAX_ARRAY_ELEMENTS, MAX_DEPTH,
};
pub use difference::{DiffKind, StructuralDifference};
pub use path::ROOT_PATH;
pub use summary::{DiffSummary, SummaryCategory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
