use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ModelError, OrderId, ProductId, UserId, VariantId};

/// Lifecycle tag of an order.
///
/// Orders are always placed as `Created`. The other states are written by
/// downstream services and only need to survive a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Confirmed,
    Failed,
}

impl OrderStatus {
    /// Returns the stored label of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OrderStatus::Created),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "FAILED" => Ok(OrderStatus::Failed),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// One product variant in an order, with catalog values snapshotted at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub product_variant_id: VariantId,

    /// Product name as the catalog reported it when the order was placed.
    pub product_name: String,

    /// Canonical size label (`"M"`, `"XL"`, ...).
    pub size: String,

    /// Unit price charged.
    pub price: Decimal,

    /// Number of units, at least 1 in a valid order.
    pub quantity: u32,
}

impl OrderLineItem {
    /// Creates a new line item.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_variant_id: impl Into<VariantId>,
        product_name: impl Into<String>,
        size: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_variant_id: product_variant_id.into(),
            product_name: product_name.into(),
            size: size.into(),
            price,
            quantity,
        }
    }

    /// Returns `price * quantity`, or `None` when the product overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sums `price * quantity` over all items with exact decimal arithmetic.
pub fn compute_total(items: &[OrderLineItem]) -> Result<Decimal, ModelError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or(ModelError::AmountOverflow)
    })
}

/// An order that has been assembled but not yet saved.
///
/// The only way to build an order aggregate. The constructor enforces the
/// aggregate invariants and derives the total, so a `NewOrder` handed to a
/// store is always internally consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    user_id: UserId,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    items: Vec<OrderLineItem>,
}

impl NewOrder {
    /// Assembles a new order in the `Created` state.
    ///
    /// Fails if the user is blank, there are no items, an item has a zero
    /// quantity or a negative price, or the total overflows.
    pub fn new(
        user_id: UserId,
        order_date: DateTime<Utc>,
        items: Vec<OrderLineItem>,
    ) -> Result<Self, ModelError> {
        if user_id.is_blank() {
            return Err(ModelError::EmptyUserId);
        }
        if items.is_empty() {
            return Err(ModelError::NoItems);
        }
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(ModelError::InvalidQuantity {
                    index,
                    quantity: item.quantity,
                });
            }
            if item.price < Decimal::ZERO {
                return Err(ModelError::NegativePrice {
                    index,
                    price: item.price,
                });
            }
        }

        let total_amount = compute_total(&items)?;

        Ok(Self {
            user_id,
            status: OrderStatus::Created,
            order_date,
            total_amount,
            items,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    /// Turns this order into a persisted one once the store has assigned an ID.
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            status: self.status,
            order_date: self.order_date,
            total_amount: self.total_amount,
            items: self.items,
        }
    }
}

/// A persisted order together with its line items.
///
/// Only obtainable from [`NewOrder::into_order`] or a store, so the total
/// always matches the items. Serializable for output, but not deserializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    items: Vec<OrderLineItem>,
}

impl Order {
    /// Rebuilds an order from stored values. The stored total is trusted.
    pub(crate) fn restore(
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
        order_date: DateTime<Utc>,
        total_amount: Decimal,
        items: Vec<OrderLineItem>,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            order_date,
            total_amount,
            items,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Line items in the order they were submitted.
    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
