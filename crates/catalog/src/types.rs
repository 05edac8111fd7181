//! Core product types and the in-memory catalog.
//!
//! Raw fields (`price`, `images`) are kept exactly as the dataset export
//! wrote them. Turning them into typed values is the job of the
//! `enrichment` crate, which never fails on them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier of a product (the dataset's `uniq_id` column)
pub type ProductId = String;

// =============================================================================
// Raw Fields
// =============================================================================

/// Price as it appears in the snapshot.
///
/// The dataset mixes plain numbers with currency strings such as `"$24.99"`.
/// Anything else (booleans, objects) lands in `Other` so a single odd cell
/// doesn't reject the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
    Other(Value),
}

/// Image field as it appears in the snapshot.
///
/// Usually a string holding a Python list literal
/// (`"['http://a/1.jpg', 'http://a/2.jpg']"`), sometimes an already-decoded
/// JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawImages {
    Text(String),
    List(Vec<Value>),
    Other(Value),
}

// =============================================================================
// ProductRecord
// =============================================================================

/// One row of the catalog snapshot.
///
/// Immutable after load; the catalog owns every record for the lifetime of
/// the process and hands out references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "uniq_id", alias = "id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub images: Option<RawImages>,
    /// Every other column of the export (brand, material, color, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProductRecord {
    /// Minimal record, mostly useful for fixtures
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: None,
            images: None,
            attributes: Map::new(),
        }
    }

    pub fn with_price(mut self, price: RawPrice) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_images(mut self, images: RawImages) -> Self {
        self.images = Some(images);
        self
    }
}

// =============================================================================
// Catalog - The In-Memory Product Table
// =============================================================================

/// Product table keyed by identifier.
///
/// Read-only once built, so it is shared behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) products: HashMap<ProductId, ProductRecord>,
    /// Identifiers in snapshot order
    pub(crate) order: Vec<ProductId>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced (if any)
    pub fn insert(&mut self, record: ProductRecord) -> Option<ProductRecord> {
        let id = record.id.clone();
        let previous = self.products.insert(id.clone(), record);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Get a single record by identifier
    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Identifiers in snapshot order
    pub fn ids(&self) -> &[ProductId] {
        &self.order
    }

    /// Iterate over records in snapshot order
    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.order.iter().filter_map(|id| self.products.get(id))
    }
}
