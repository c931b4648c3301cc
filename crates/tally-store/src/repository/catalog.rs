//! Product and staff collections.

use tally_core::{Product, Staff};
use tracing::debug;

use crate::documents::{DocumentKey, DocumentStore, WriteOutcome};
use crate::seed;

/// Whole-collection access to products and staff.
///
/// ## Usage
/// ```rust,ignore
/// let mut products = store.catalog().products().await;
/// products.retain(|p| p.id != "p4");
/// store.catalog().set_products(&products).await;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogStore {
    docs: DocumentStore,
}

impl CatalogStore {
    pub fn new(docs: DocumentStore) -> Self {
        CatalogStore { docs }
    }

    /// All products, in stored order. Seed products when nothing is stored.
    pub async fn products(&self) -> Vec<Product> {
        self.docs.load(DocumentKey::Products, seed::products).await
    }

    /// Replaces the product collection.
    pub async fn set_products(&self, products: &[Product]) -> WriteOutcome {
        debug!(count = products.len(), "Writing products");
        self.docs.save(DocumentKey::Products, products).await
    }

    /// Looks up a single product by id.
    pub async fn product(&self, id: &str) -> Option<Product> {
        self.products().await.into_iter().find(|p| p.id == id)
    }

    /// All staff, in stored order. Seed staff when nothing is stored.
    pub async fn staff(&self) -> Vec<Staff> {
        self.docs.load(DocumentKey::Staff, seed::staff).await
    }

    /// Replaces the staff collection.
    pub async fn set_staff(&self, staff: &[Staff]) -> WriteOutcome {
        debug!(count = staff.len(), "Writing staff");
        self.docs.save(DocumentKey::Staff, staff).await
    }

    /// Resolves a staff member by access code.
    pub async fn staff_by_code(&self, code: &str) -> Option<Staff> {
        self.staff().await.into_iter().find(|s| s.access_code == code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
