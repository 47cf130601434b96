//! Catalog lookup trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ProductId, VariantId};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::order::Size;

/// Catalog facts about one product variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display name of the product.
    pub product_name: String,
    /// Size of this variant.
    pub size: Size,
    /// Current unit price.
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(product_name: impl Into<String>, size: Size, unit_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            size,
            unit_price,
        }
    }
}

/// Failure to consult the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Looks up a product variant.
    ///
    /// Returns `Ok(None)` when the catalog does not know the variant.
    async fn resolve_variant(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
    ) -> Result<Option<CatalogEntry>, CatalogError>;
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    entries: HashMap<(ProductId, VariantId), CatalogEntry>,
    unavailable: bool,
}

/// In-memory catalog for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variant.
    pub async fn insert(
        &self,
        product_id: impl Into<ProductId>,
        variant_id: impl Into<VariantId>,
        entry: CatalogEntry,
    ) {
        self.state
            .write()
            .await
            .entries
            .insert((product_id.into(), variant_id.into()), entry);
    }

    /// Makes every lookup fail until switched back.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn resolve_variant(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let state = self.state.read().await;

        if state.unavailable {
            return Err(CatalogError::Unavailable(
                "catalog is switched off".to_string(),
            ));
        }

        Ok(state.entries.get(&(product_id, variant_id)).cloned())
    }
}
