//! Coarse roll-up of a difference list

use crate::difference::StructuralDifference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which side "has more" for a group of differences
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryCategory {
    /// Legacy carries keys the candidate lacks
    LegacyHasMore,
    /// Candidate carries keys legacy lacks
    NewHasMore,
    /// Both sides disagree on shape, length or presence
    BothDifferent,
}

impl SummaryCategory {
    /// Wire name used in log payloads
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LegacyHasMore => "legacy_has_more",
            Self::NewHasMore => "new_has_more",
            Self::BothDifferent => "both_different",
        }
    }
}

/// Deduplicated set of [`SummaryCategory`] values
///
/// Empty exactly when the difference list it was derived from is empty.
/// Order carries no meaning; serialization is sorted for stable log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffSummary(BTreeSet<SummaryCategory>);

impl DiffSummary {
    /// Derive the summary from a difference list
    #[must_use]
    pub fn from_differences(diffs: &[StructuralDifference]) -> Self {
        Self(diffs.iter().map(|d| d.kind.category()).collect())
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, category: SummaryCategory) -> bool {
        self.0.contains(&category)
    }

    /// Number of distinct categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no differences were observed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the categories
    pub fn iter(&self) -> impl Iterator<Item = SummaryCategory> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SummaryCategory> for DiffSummary {
    fn from_iter<I: IntoIterator<Item = SummaryCategory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
