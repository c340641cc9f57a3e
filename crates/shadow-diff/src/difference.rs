//! Difference records produced by a comparison pass

use crate::summary::SummaryCategory;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Classification of a single structural difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Key present on the legacy side only
    MissingKey,
    /// Key present on the candidate side only
    ExtraKey,
    /// Arrays of different lengths
    ArrayLengthMismatch,
    /// One side empty or absent, the other present
    PresenceMismatch,
    /// Coarse value type changed
    TypeMismatch,
}

impl DiffKind {
    /// Wire name used in log payloads
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::ExtraKey => "extra_key",
            Self::ArrayLengthMismatch => "array_length_mismatch",
            Self::PresenceMismatch => "presence_mismatch",
            Self::TypeMismatch => "type_mismatch",
        }
    }

    /// Summary bucket this kind rolls up into
    #[inline]
    #[must_use]
    pub fn category(self) -> SummaryCategory {
        match self {
            Self::ExtraKey => SummaryCategory::NewHasMore,
            Self::MissingKey => SummaryCategory::LegacyHasMore,
            Self::ArrayLengthMismatch | Self::PresenceMismatch | Self::TypeMismatch => {
                SummaryCategory::BothDifferent
            }
        }
    }
}

impl Display for DiffKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One difference found between the two compared values
///
/// `value_a` is the legacy-side value and `value_b` the candidate-side value.
/// Either is `None` when that side has no value at `path` (for key
/// differences), and for [`DiffKind::ArrayLengthMismatch`] both hold the array
/// lengths rather than the arrays themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralDifference {
    /// Dotted/bracketed locator, e.g. `items[2].price`
    pub path: String,
    /// Difference classification
    pub kind: DiffKind,
    /// Legacy-side value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_a: Option<Value>,
    /// Candidate-side value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_b: Option<Value>,
}

impl StructuralDifference {
    /// Create a difference carrying both sides
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, kind: DiffKind, a: Option<Value>, b: Option<Value>) -> Self {
        Self {
            path: path.into(),
            kind,
            value_a: a,
            value_b: b,
        }
    }
}

impl Display for StructuralDifference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_categories() {
        assert_eq!(DiffKind::ExtraKey.category(), SummaryCategory::NewHasMore);
        assert_eq!(DiffKind::MissingKey.category(), SummaryCategory::LegacyHasMore);
        assert_eq!(DiffKind::TypeMismatch.category(), SummaryCategory::BothDifferent);
        assert_eq!(DiffKind::PresenceMismatch.category(), SummaryCategory::BothDifferent);
        assert_eq!(
            DiffKind::ArrayLengthMismatch.category(),
            SummaryCategory::BothDifferent
        );
    }

    #[test]
    fn kind_serializes_snake_case() {
        let encoded = serde_json::to_value(DiffKind::ArrayLengthMismatch).unwrap();
        assert_eq!(encoded, json!("array_length_mismatch"));
        assert_eq!(DiffKind::ArrayLengthMismatch.to_string(), "array_length_mismatch");
    }

    #[test]
    fn difference_omits_absent_side() {
        let diff = StructuralDifference::new("b", DiffKind::MissingKey, Some(json!(2)), None);
        let encoded = serde_json::to_value(&diff).unwrap();

        assert_eq!(encoded, json!({"path": "b", "kind": "missing_key", "value_a": 2}));
        assert_eq!(diff.to_string(), "missing_key at b");
    }
}
