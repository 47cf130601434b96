//! Domain error types.

use order_store::StoreError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::order::ValidationError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request was rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The order store failed to save or read orders.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The catalog could not be consulted.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl DomainError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Persistence(_) => "persistence",
            DomainError::Catalog(_) => "catalog",
        }
    }
}
