//! Value normalizers
//!
//! A normalizer projects a domain payload into a canonical JSON shape before
//! it reaches the differ, so that one implementation omitting a key it
//! considers empty does not show up as drift. Both outcomes of a call always
//! go through the same normalizer instance.

pub mod catalog;
mod shape;

pub use shape::{CanonicalShape, NON_ARRAY_SENTINEL, NON_OBJECT_SENTINEL};

use crate::error::CompareError;
use serde::Serialize;
use serde_json::Value;

/// Projection of a domain value into a comparable JSON value
///
/// Runs inside the detached comparison task, never on the response path.
pub trait Normalizer<T>: Send + Sync + 'static {
    /// Project `value` into its canonical shape
    ///
    /// # Errors
    /// Returns `CompareError` if the value cannot be projected.
    fn normalize(&self, value: &T) -> Result<Value, CompareError>;
}

impl<T, F> Normalizer<T> for F
where
    F: Fn(&T) -> Result<Value, CompareError> + Send + Sync + 'static,
{
    fn normalize(&self, value: &T) -> Result<Value, CompareError> {
        self(value)
    }
}

/// Normalizer that compares the plain serde encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct AsJson;

impl<T: Serialize> Normalizer<T> for AsJson {
    fn normalize(&self, value: &T) -> Result<Value, CompareError> {
        serde_json::to_value(value).map_err(|e| CompareError::normalize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn closures_are_normalizers() {
        let lengths = |items: &Vec<String>| -> Result<Value, CompareError> {
            Ok(Value::from(items.len()))
        };

        let value = lengths.normalize(&vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(value, json!(2));
    }

    #[test]
    fn as_json_uses_serde_encoding() {
        #[derive(Serialize)]
        struct Product {
            id: u32,
            title: Option<String>,
        }

        let value = AsJson
            .normalize(&Product {
                id: 7,
                title: None,
            })
            .unwrap();
        assert_eq!(value, json!({"id": 7, "title": null}));
    }

    #[test]
    fn as_json_reports_encoding_failure() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);

        let err = AsJson.normalize(&map).unwrap_err();
        assert!(matches!(err, CompareError::Normalize(_)));
    }
}
