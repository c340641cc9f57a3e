//! Catalog shapes
//!
//! Canonical shapes for product payloads served by both the legacy catalog
//! client and the search-backed replacement.

use super::CanonicalShape;
use serde_json::Value;

/// Current version of [`product_listing_shape`]
pub const PRODUCT_LISTING_VERSION: u32 = 3;

/// Shape of one product in a listing response
#[must_use]
pub fn product_listing_shape() -> CanonicalShape {
    CanonicalShape::new(PRODUCT_LISTING_VERSION)
        .text("id")
        .text("sku")
        .text("title")
        .text("description")
        .text("brand")
        .optional("price")
        .field("available", Value::Bool(false))
        .list("images")
        .list("categories")
        .list("variants")
}
