//! # Catalog Crate
//!
//! This crate loads the product catalog snapshot and serves keyed lookups.
//!
//! ## Main Components
//!
//! - **types**: Product record, raw field types, the `Catalog` table
//! - **parser**: Decode JSON Lines / JSON array snapshots
//! - **index**: Build the catalog, ranked lookups, title search
//! - **store**: Startup-loaded catalog with its readiness flag
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::CatalogStore;
//! use std::path::Path;
//!
//! let store = CatalogStore::load(Path::new("products.jsonl"));
//! let catalog = store.catalog()?;
//! let ranked = catalog.lookup(&["p1", "p3"])?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use store::CatalogStore;
pub use types::{Catalog, ProductId, ProductRecord, RawImages, RawPrice};
