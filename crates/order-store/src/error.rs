use rust_decimal::Decimal;
use thiserror::Error;

/// Violations of the order aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An order must belong to a user.
    #[error("User ID is required")]
    EmptyUserId,

    /// An order must contain at least one line item.
    #[error("Order has no items")]
    NoItems,

    /// Line item quantities start at 1.
    #[error("Invalid quantity for item {index}: {quantity} (must be at least 1)")]
    InvalidQuantity { index: usize, quantity: u32 },

    /// A line item carries a negative unit price.
    #[error("Invalid price for item {index}: {price} (must not be negative)")]
    NegativePrice { index: usize, price: Decimal },

    /// The order total does not fit the decimal range.
    #[error("Order total overflows the supported decimal range")]
    AmountOverflow,

    /// A status label that no known status maps to.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
}

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The order handed to the store, or read back from it, breaks an invariant.
    #[error("Invalid order: {0}")]
    Model(#[from] ModelError),

    /// A stored row could not be mapped back onto the model.
    #[error("Invalid row in {table}: {reason}")]
    InvalidRow { table: &'static str, reason: String },

    /// A value does not fit the column it is written to.
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// The store rejected the operation without touching any data.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
