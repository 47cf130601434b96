//! Order placement, order history and related types.

mod placement;
mod query;
mod requests;
mod summary;
mod value_objects;

pub use placement::{OrderPlacementService, PricingPolicy};
pub use query::OrderQueryService;
pub use requests::{LineItemRequest, OrderPlacementRequest};
pub use summary::{LineItemSummary, OrderSummary};
pub use value_objects::{MAX_QUANTITY, Size};

use common::{ProductId, VariantId};
use order_store::ModelError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a placement or query request is rejected before touching the store.
///
/// `index` always refers to the position of the offending line item in the
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// User ID is required.
    #[error("User ID is required")]
    EmptyUserId,

    /// An order needs at least one line item.
    #[error("Order has no items")]
    NoItems,

    /// A required line item field is absent.
    #[error("Item {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// Product name is blank.
    #[error("Item {index} has an empty product name")]
    EmptyProductName { index: usize },

    /// Quantity outside `1..=MAX_QUANTITY`.
    #[error("Invalid quantity for item {index}: {quantity} (must be between 1 and {MAX_QUANTITY})")]
    InvalidQuantity { index: usize, quantity: i64 },

    /// Unit price below zero.
    #[error("Invalid price for item {index}: {price} (must not be negative)")]
    NegativePrice { index: usize, price: Decimal },

    /// Size selector that does not name a known size.
    #[error("Item {index} has unknown size '{size}'")]
    UnknownSize { index: usize, size: String },

    /// The catalog does not know the product variant.
    #[error("Item {index} references unknown variant {variant_id} of product {product_id}")]
    UnknownVariant {
        index: usize,
        product_id: ProductId,
        variant_id: VariantId,
    },

    /// The caller's price differs from the catalog price.
    #[error("Price mismatch for item {index}: catalog price is {expected}, request says {actual}")]
    PriceMismatch {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },

    /// The caller's size differs from the size of the catalog variant.
    #[error("Size mismatch for item {index}: variant is {expected}, request says {actual}")]
    SizeMismatch {
        index: usize,
        expected: Size,
        actual: String,
    },

    /// The assembled order breaks an aggregate invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}
