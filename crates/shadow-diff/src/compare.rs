//! Bounded recursive comparison
//!
//! Walks both values in lockstep, classifying each disagreement into a
//! [`DiffKind`]. The walk stops descending once [`DiffLimits::max_depth`] is
//! exceeded and only visits the first [`DiffLimits::max_array_elements`]
//! elements of equal-length arrays.

use crate::difference::{DiffKind, StructuralDifference};
use crate::path::PathBuffer;
use crate::summary::DiffSummary;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default maximum nesting depth that is still compared
pub const MAX_DEPTH: usize = 10;

/// Default number of leading array elements compared per array
pub const MAX_ARRAY_ELEMENTS: usize = 10;

/// Traversal bounds for a comparison pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffLimits {
    /// Deepest level still compared; deeper branches are skipped silently
    pub max_depth: usize,
    /// Leading elements compared in equal-length arrays
    pub max_array_elements: usize,
}

impl DiffLimits {
    /// Create limits
    #[inline]
    #[must_use]
    pub fn new(max_depth: usize, max_array_elements: usize) -> Self {
        Self {
            max_depth,
            max_array_elements,
        }
    }
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self::new(MAX_DEPTH, MAX_ARRAY_ELEMENTS)
    }
}

/// Coarse shape category of a value
///
/// `null` shares the object category: a null and an object are compared for
/// presence, not reported as a type change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// JSON array
    Array,
    /// JSON object or null
    Object,
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Bool,
}

impl Shape {
    /// Classify a value
    #[inline]
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::Array,
            Value::Object(_) | Value::Null => Self::Object,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
        }
    }
}

/// Result of one comparison pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Differences in discovery order
    pub diffs: Vec<StructuralDifference>,
    /// Categories present in `diffs`
    pub summary: DiffSummary,
}

impl Comparison {
    /// Check if the two values were structurally equal
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Compare two values with the default [`DiffLimits`]
///
/// `a` is the legacy value and `b` the candidate value.
#[must_use]
pub fn structural_compare(a: &Value, b: &Value) -> Comparison {
    structural_compare_with(a, b, DiffLimits::default())
}

/// Compare two values with explicit traversal bounds
#[must_use]
pub fn structural_compare_with(a: &Value, b: &Value, limits: DiffLimits) -> Comparison {
    let mut walker = Walker {
        limits,
        path: PathBuffer::new(),
        diffs: Vec::new(),
    };
    walker.visit(a, b, 0);

    let summary = DiffSummary::from_differences(&walker.diffs);
    Comparison {
        diffs: walker.diffs,
        summary,
    }
}

struct Walker {
    limits: DiffLimits,
    path: PathBuffer,
    diffs: Vec<StructuralDifference>,
}

impl Walker {
    fn visit(&mut self, a: &Value, b: &Value, depth: usize) {
        if depth > self.limits.max_depth {
            return;
        }

        if Shape::of(a) != Shape::of(b) {
            self.record(DiffKind::TypeMismatch, Some(a.clone()), Some(b.clone()));
            return;
        }

        match (a, b) {
            (Value::Array(left), Value::Array(right)) => self.visit_arrays(left, right, depth),
            (Value::Object(left), Value::Object(right)) => self.visit_objects(left, right, depth),
            _ => {
                if is_empty(a) != is_empty(b) {
                    self.record(DiffKind::PresenceMismatch, Some(a.clone()), Some(b.clone()));
                }
            }
        }
    }

    fn visit_arrays(&mut self, a: &[Value], b: &[Value], depth: usize) {
        if a.len() != b.len() {
            self.record(
                DiffKind::ArrayLengthMismatch,
                Some(Value::from(a.len())),
                Some(Value::from(b.len())),
            );
            return;
        }

        let compared = a.len().min(self.limits.max_array_elements);
        for (index, (left, right)) in a.iter().zip(b).take(compared).enumerate() {
            let mark = self.path.push_index(index);
            self.visit(left, right, depth + 1);
            self.path.restore(mark);
        }
    }

    fn visit_objects(&mut self, a: &Map<String, Value>, b: &Map<String, Value>, depth: usize) {
        for (key, value) in a {
            if !b.contains_key(key) {
                let mark = self.path.push_key(key);
                self.record(DiffKind::MissingKey, Some(value.clone()), None);
                self.path.restore(mark);
            }
        }

        for (key, value) in b {
            if !a.contains_key(key) {
                let mark = self.path.push_key(key);
                self.record(DiffKind::ExtraKey, None, Some(value.clone()));
                self.path.restore(mark);
            }
        }

        for (key, left) in a {
            if let Some(right) = b.get(key) {
                let mark = self.path.push_key(key);
                self.visit(left, right, depth + 1);
                self.path.restore(mark);
            }
        }
    }

    fn record(&mut self, kind: DiffKind, a: Option<Value>, b: Option<Value>) {
        self.diffs
            .push(StructuralDifference::new(self.path.to_locator(), kind, a, b));
    }
}

/// Null, empty string and empty array count as "absent"
#[inline]
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SummaryCategory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn identical_values_have_no_diffs() {
        let value = json!({"id": "p1", "tags": ["a", "b"], "price": {"amount": 10}});
        let comparison = structural_compare(&value, &value);

        assert!(comparison.is_empty());
        assert!(comparison.summary.is_empty());
    }

    #[test]
    fn missing_key_at_root() {
        let comparison = structural_compare(&json!({"a": 1, "b": 2}), &json!({"a": 1}));

        assert_eq!(
            comparison.diffs,
            vec![StructuralDifference::new(
                "b",
                DiffKind::MissingKey,
                Some(json!(2)),
                None
            )]
        );
        assert!(comparison.summary.contains(SummaryCategory::LegacyHasMore));
        assert_eq!(comparison.summary.len(), 1);
    }

    #[test]
    fn extra_key_at_root() {
        let comparison = structural_compare(&json!({"a": 1}), &json!({"a": 1, "b": 2}));

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].path, "b");
        assert_eq!(comparison.diffs[0].kind, DiffKind::ExtraKey);
        assert_eq!(comparison.diffs[0].value_a, None);
        assert_eq!(comparison.diffs[0].value_b, Some(json!(2)));
        assert!(comparison.summary.contains(SummaryCategory::NewHasMore));
    }

    #[test]
    fn array_length_mismatch_reports_lengths() {
        let comparison = structural_compare(&json!({"arr": [1, 2]}), &json!({"arr": [1]}));

        assert_eq!(
            comparison.diffs,
            vec![StructuralDifference::new(
                "arr",
                DiffKind::ArrayLengthMismatch,
                Some(json!(2)),
                Some(json!(1))
            )]
        );
    }

    #[test]
    fn leaf_content_is_not_compared() {
        assert!(structural_compare(&json!("red"), &json!("blue")).is_empty());
        assert!(structural_compare(&json!(1), &json!(2.5)).is_empty());
        assert!(structural_compare(&json!(true), &json!(false)).is_empty());
        assert!(structural_compare(&json!(null), &json!(null)).is_empty());
    }

    #[test]
    fn presence_mismatch_on_empty_string() {
        let comparison = structural_compare(&json!({"name": "Chair"}), &json!({"name": ""}));

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].kind, DiffKind::PresenceMismatch);
        assert_eq!(comparison.diffs[0].path, "name");
        assert_eq!(comparison.diffs[0].value_a, Some(json!("Chair")));
        assert_eq!(comparison.diffs[0].value_b, Some(json!("")));
    }

    #[test]
    fn null_against_object_is_presence_not_type() {
        let comparison = structural_compare(&json!({"p": {"x": 1}}), &json!({"p": null}));

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].kind, DiffKind::PresenceMismatch);
    }

    #[test]
    fn type_mismatch_at_root_uses_root_locator() {
        let comparison = structural_compare(&json!([1]), &json!({"a": 1}));

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].path, "(root)");
        assert_eq!(comparison.diffs[0].kind, DiffKind::TypeMismatch);
        assert_eq!(comparison.diffs[0].value_a, Some(json!([1])));
        assert_eq!(comparison.diffs[0].value_b, Some(json!({"a": 1})));
    }

    #[test]
    fn type_mismatch_stops_descent() {
        let comparison =
            structural_compare(&json!({"v": {"deep": {"x": 1}}}), &json!({"v": "flat"}));

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].path, "v");
    }

    #[test]
    fn element_diff_path_includes_index() {
        let a = json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4, "sku": "x"}]});
        let b = json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}]});
        let comparison = structural_compare(&a, &b);

        assert_eq!(comparison.diffs.len(), 1);
        assert_eq!(comparison.diffs[0].path, "items[3].sku");
    }

    #[test]
    fn root_array_elements_use_bare_index() {
        let comparison = structural_compare(&json!([{"a": 1}]), &json!([{}]));
        assert_eq!(comparison.diffs[0].path, "[0].a");
    }

    #[test]
    fn elements_past_cap_are_ignored() {
        let mut a: Vec<Value> = (0..15).map(|i| json!({"i": i})).collect();
        let b = a.clone();
        a[12] = json!({"i": 12, "extra": true});

        let comparison = structural_compare(&Value::Array(a), &Value::Array(b));
        assert!(comparison.is_empty());
    }

    #[test]
    fn depth_limit_hides_deep_branches() {
        fn nest(levels: usize, leaf: Value) -> Value {
            (0..levels).fold(leaf, |inner, _| json!({ "n": inner }))
        }

        // Leaf object sits at depth 11, beyond the default limit.
        let a = nest(11, json!({"x": 1}));
        let b = nest(11, json!({"y": 1}));
        assert!(structural_compare(&a, &b).is_empty());

        // One level shallower is still compared.
        let a = nest(10, json!({"x": 1}));
        let b = nest(10, json!({"y": 1}));
        assert_eq!(structural_compare(&a, &b).diffs.len(), 2);
    }

    #[test]
    fn custom_limits_apply() {
        let a = json!([{"a": 1}, {"a": 1}]);
        let b = json!([{"a": 1}, {}]);

        assert!(structural_compare_with(&a, &b, DiffLimits::new(10, 1)).is_empty());
        assert_eq!(
            structural_compare_with(&a, &b, DiffLimits::new(10, 2)).diffs.len(),
            1
        );
        assert!(structural_compare_with(&a, &b, DiffLimits::new(0, 10)).is_empty());
    }

    #[test]
    fn mixed_diffs_cover_all_categories() {
        let a = json!({"a": 1, "list": [1, 2], "shared": {"k": 1}});
        let b = json!({"list": [1], "shared": {"k": 1, "z": 2}});
        let comparison = structural_compare(&a, &b);

        let kinds: Vec<_> = comparison.diffs.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiffKind::MissingKey,
                DiffKind::ArrayLengthMismatch,
                DiffKind::ExtraKey
            ]
        );
        assert_eq!(comparison.summary.len(), 3);
        assert!(comparison.summary.contains(SummaryCategory::LegacyHasMore));
        assert!(comparison.summary.contains(SummaryCategory::NewHasMore));
        assert!(comparison.summary.contains(SummaryCategory::BothDifferent));
    }

    #[test]
    fn shape_classification() {
        assert_eq!(Shape::of(&json!(null)), Shape::Object);
        assert_eq!(Shape::of(&json!({})), Shape::Object);
        assert_eq!(Shape::of(&json!([])), Shape::Array);
        assert_eq!(Shape::of(&json!("")), Shape::String);
        assert_eq!(Shape::of(&json!(0)), Shape::Number);
        assert_eq!(Shape::of(&json!(false)), Shape::Bool);
    }
}
