//! Startup-loaded catalog with a single readiness flag.
//!
//! The service keeps running when the snapshot fails to load; every request
//! then fails fast with [`CatalogError::Unavailable`] instead of attempting
//! a lookup. The state never changes after construction.

use crate::error::{CatalogError, Result};
use crate::types::Catalog;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone)]
pub enum CatalogStore {
    Ready(Arc<Catalog>),
    Unavailable { reason: String },
}

impl CatalogStore {
    /// Load the snapshot once. Never fails: a load error is logged and
    /// turns the store permanently unavailable.
    pub fn load(path: &Path) -> Self {
        match Catalog::load_from_file(path) {
            Ok(catalog) => CatalogStore::Ready(Arc::new(catalog)),
            Err(e) => {
                error!("Product catalog not loaded from {:?}: {}", path, e);
                CatalogStore::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(catalog: Catalog) -> Self {
        CatalogStore::Ready(Arc::new(catalog))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        CatalogStore::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CatalogStore::Ready(_))
    }

    /// The loaded catalog, or `Unavailable` when the startup load failed
    pub fn catalog(&self) -> Result<&Arc<Catalog>> {
        match self {
            CatalogStore::Ready(catalog) => Ok(catalog),
            CatalogStore::Unavailable { reason } => Err(CatalogError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }
}

impl From<Catalog> for CatalogStore {
    fn from(catalog: Catalog) -> Self {
        CatalogStore::ready(catalog)
    }
}
