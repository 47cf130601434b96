//! Read-side views of persisted orders.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use order_store::{Order, OrderLineItem, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order as shown in a user's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub items: Vec<LineItemSummary>,
}

/// A line item as shown in a user's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSummary {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl From<&OrderLineItem> for LineItemSummary {
    fn from(item: &OrderLineItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            size: item.size.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            status: order.status(),
            order_date: order.order_date(),
            total_amount: order.total_amount(),
            items: order.items().iter().map(LineItemSummary::from).collect(),
        }
    }
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self::from(&order)
    }
}
