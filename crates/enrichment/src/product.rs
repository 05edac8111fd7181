//! The product shape returned to clients.

use catalog::{ProductId, ProductRecord};
use serde::{Deserialize, Serialize};

use crate::normalize::{first_image_url, normalize_price};

/// A catalog record with typed fields and a description, built per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub description: String,
}

impl NormalizedProduct {
    /// Normalize the raw fields of `record` and attach `description`
    pub fn from_record(record: &ProductRecord, description: String) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            image: first_image_url(record.images.as_ref()),
            price: normalize_price(record.price.as_ref()),
            description,
        }
    }
}
