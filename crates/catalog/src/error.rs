//! Error types for the catalog crate.

use thiserror::Error;

/// Errors raised while loading the catalog snapshot or looking up products.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Snapshot file could not be opened or read
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A record in the snapshot couldn't be decoded
    ///
    /// `line` is 1-based; for JSON array snapshots it is the line reported
    /// by the JSON decoder.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Two records in the snapshot share the same identifier
    #[error("Duplicate product id in snapshot: {id}")]
    DuplicateId { id: String },

    /// A ranked identifier has no record in the catalog
    #[error("Product not found in catalog: {id}")]
    NotFound { id: String },

    /// The snapshot failed to load at startup, so no lookup is possible
    #[error("Catalog unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
