//! Domain layer for the order service.
//!
//! This crate provides:
//! - `OrderPlacementService`: validates a placement request, materializes its
//!   line items, derives the total and saves the order atomically
//! - `OrderQueryService`: a user's order history, newest first
//! - The catalog lookup collaborator used for optional price verification

pub mod catalog;
pub mod error;
pub mod order;

pub use catalog::{CatalogEntry, CatalogError, CatalogLookup, InMemoryCatalog};
pub use error::DomainError;
pub use order::{
    LineItemRequest, LineItemSummary, MAX_QUANTITY, OrderPlacementRequest,
    OrderPlacementService, OrderQueryService, OrderSummary, PricingPolicy, Size, ValidationError,
};
