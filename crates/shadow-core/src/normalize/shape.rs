//! Declared canonical shapes
//!
//! A [`CanonicalShape`] is the hand-maintained table of fields one domain
//! type is compared on, each with the default substituted when a side omits
//! it. The table is a versioned contract with the domain schema.

use super::Normalizer;
use crate::error::CompareError;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Replaces a payload that should have been an array
pub const NON_ARRAY_SENTINEL: &str = "non-array";

/// Replaces an array element that should have been an object
pub const NON_OBJECT_SENTINEL: &str = "non-object";

/// Fixed key set with defaults for the elements of a collection payload
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalShape {
    version: u32,
    fields: Vec<(String, Value)>,
}

impl CanonicalShape {
    /// Create empty shape
    #[inline]
    #[must_use]
    pub fn new(version: u32) -> Self {
        Self {
            version,
            fields: Vec::new(),
        }
    }

    /// Declare a field with its default; redeclaring replaces the default
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, default: Value) -> Self {
        let key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = default,
            None => self.fields.push((key, default)),
        }
        self
    }

    /// Declare a text field defaulting to `""`
    #[inline]
    #[must_use]
    pub fn text(self, key: impl Into<String>) -> Self {
        self.field(key, Value::String(String::new()))
    }

    /// Declare a collection field defaulting to `[]`
    #[inline]
    #[must_use]
    pub fn list(self, key: impl Into<String>) -> Self {
        self.field(key, Value::Array(Vec::new()))
    }

    /// Declare an optional field defaulting to `null`
    #[inline]
    #[must_use]
    pub fn optional(self, key: impl Into<String>) -> Self {
        self.field(key, Value::Null)
    }

    /// Shape version
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Declared keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Project a raw payload onto the declared shape
    ///
    /// - array input: each object element keeps exactly the declared keys,
    ///   with defaults for keys that are absent or null
    /// - non-object element: `{"_type": "non-object"}`
    /// - non-array input: `{"_type": "non-array"}`
    #[must_use]
    pub fn canonicalize(&self, raw: &Value) -> Value {
        let Value::Array(items) = raw else {
            return json!({ "_type": NON_ARRAY_SENTINEL });
        };

        items
            .iter()
            .map(|item| match item {
                Value::Object(object) => Value::Object(self.project(object)),
                _ => json!({ "_type": NON_OBJECT_SENTINEL }),
            })
            .collect()
    }

    fn project(&self, object: &Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(key, default)| {
                let value = match object.get(key) {
                    Some(Value::Null) | None => default.clone(),
                    Some(present) => present.clone(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl<T: Serialize> Normalizer<T> for CanonicalShape {
    fn normalize(&self, value: &T) -> Result<Value, CompareError> {
        let raw = serde_json::to_value(value).map_err(|e| CompareError::normalize(e.to_string()))?;
        Ok(self.canonicalize(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape() -> CanonicalShape {
        CanonicalShape::new(1).text("id").text("title").list("images")
    }

    #[test]
    fn fills_defaults_and_drops_undeclared_keys() {
        let raw = json!([
            {"id": "a", "title": "Chair", "images": ["x.png"], "internal": 1},
            {"id": "b", "title": null}
        ]);

        assert_eq!(
            shape().canonicalize(&raw),
            json!([
                {"id": "a", "title": "Chair", "images": ["x.png"]},
                {"id": "b", "title": "", "images": []}
            ])
        );
    }

    #[test]
    fn non_array_input_becomes_sentinel() {
        assert_eq!(
            shape().canonicalize(&json!({"id": "a"})),
            json!({"_type": "non-array"})
        );
        assert_eq!(shape().canonicalize(&Value::Null), json!({"_type": "non-array"}));
    }

    #[test]
    fn non_object_element_becomes_sentinel() {
        assert_eq!(
            shape().canonicalize(&json!(["a", {"id": "b"}])),
            json!([{"_type": "non-object"}, {"id": "b", "title": "", "images": []}])
        );
    }

    #[test]
    fn redeclaring_replaces_default() {
        let shape = CanonicalShape::new(2).text("id").field("id", json!(0));
        assert_eq!(shape.keys().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(shape.canonicalize(&json!([{}])), json!([{"id": 0}]));
        assert_eq!(shape.version(), 2);
    }

    #[test]
    fn normalizes_serializable_payloads() {
        #[derive(Serialize)]
        struct Row {
            id: &'static str,
        }

        let value = shape().normalize(&vec![Row { id: "a" }]).unwrap();
        assert_eq!(value, json!([{"id": "a", "title": "", "images": []}]));

        let optional = CanonicalShape::new(1).optional("price");
        assert_eq!(optional.canonicalize(&json!([{}])), json!([{"price": null}]));
    }
}
