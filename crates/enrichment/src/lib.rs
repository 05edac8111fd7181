//! Per-product enrichment for recommendation responses.
//!
//! This crate provides:
//! - Field normalization for raw price / image cells ([`normalize`])
//! - A parser for the Python list literals those cells contain ([`literal`])
//! - Marketing description generation with a deterministic fallback
//!   ([`description`])
//! - The [`NormalizedProduct`] response shape
//!
//! ## Example Usage
//! ```ignore
//! use enrichment::{DescriptionGenerator, NormalizedProduct};
//!
//! let generator = DescriptionGenerator::new(gemini_client);
//! let description = generator.generate(&record.title).await;
//! let product = NormalizedProduct::from_record(record, description);
//! ```

pub mod description;
pub mod literal;
pub mod normalize;
pub mod product;

// Re-export main types
pub use description::{build_prompt, fallback_description, DescriptionGenerator};
pub use normalize::{first_image_url, normalize_price, DEFAULT_IMAGE_URL};
pub use product::NormalizedProduct;
