//! Catalog building and lookup logic.
//!
//! - Build the catalog from a snapshot, rejecting duplicate identifiers
//! - Ranked lookup that preserves the caller's order
//! - Title search used by the operator CLI

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

impl Catalog {
    /// Load the whole catalog from a snapshot file
    ///
    /// Steps:
    /// 1. Parse every record (in parallel for JSON Lines)
    /// 2. Insert records in file order
    /// 3. Fail on the first duplicated identifier
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading product catalog from {:?}", path);
        let start = Instant::now();

        let records = parser::parse_snapshot(path)?;
        let catalog = Self::from_records(records)?;

        info!(
            "Loaded {} products in {:.2?}",
            catalog.len(),
            start.elapsed()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-decoded records
    pub fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for record in records {
            if catalog.contains(&record.id) {
                return Err(CatalogError::DuplicateId { id: record.id });
            }
            catalog.insert(record);
        }
        Ok(catalog)
    }

    /// Look up a ranked list of identifiers.
    ///
    /// Records come back in the same order as `ids`. A single missing
    /// identifier fails the whole lookup.
    pub fn lookup<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&ProductRecord>> {
        let records = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id).ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Looked up {} products", records.len());
        Ok(records)
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) title matches come first, then substring
    /// matches; within each group snapshot order is kept.
    pub fn search_titles(&self, text: &str, limit: usize) -> Vec<&ProductRecord> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &ProductRecord)> = self
            .iter()
            .filter_map(|record| {
                let title = record.title.to_lowercase();
                if title == needle {
                    Some((0, record))
                } else if title.contains(&needle) {
                    Some((1, record))
                } else {
                    None
                }
            })
            .collect();

        // stable sort keeps snapshot order inside each group
        matches.sort_by_key(|(rank, _)| *rank);
        matches.into_iter().take(limit).map(|(_, record)| record).collect()
    }
}
