//! Placement request types.

use common::{ProductId, UserId, VariantId};
use order_store::OrderLineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MAX_QUANTITY, Size, ValidationError};

/// Request to place an order on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlacementRequest {
    pub user_id: UserId,
    /// Line items in submission order.
    pub items: Vec<LineItemRequest>,
}

impl OrderPlacementRequest {
    pub fn new(user_id: impl Into<UserId>, items: Vec<LineItemRequest>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
        }
    }
}

/// One requested line item as submitted by the caller.
///
/// Every field is optional so that an absent field surfaces as a
/// [`ValidationError::MissingField`] naming the item, rather than a decoding
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub product_id: Option<ProductId>,
    pub product_variant_id: Option<VariantId>,
    pub product_name: Option<String>,
    /// Size selector, matched case-insensitively.
    pub size: Option<String>,
    pub quantity: Option<i64>,
    /// Unit price, as a JSON number or string. Numbers are read digit for
    /// digit, never through `f64`.
    #[serde(
        default,
        deserialize_with = "rust_decimal::serde::arbitrary_precision_option::deserialize"
    )]
    pub price: Option<Decimal>,
}

impl LineItemRequest {
    /// Creates a request with every field present.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_variant_id: impl Into<VariantId>,
        product_name: impl Into<String>,
        size: impl Into<String>,
        quantity: i64,
        price: Decimal,
    ) -> Self {
        Self {
            product_id: Some(product_id.into()),
            product_variant_id: Some(product_variant_id.into()),
            product_name: Some(product_name.into()),
            size: Some(size.into()),
            quantity: Some(quantity),
            price: Some(price),
        }
    }

    /// Validates the request and snapshots it into an order line item.
    ///
    /// `index` is the position of the item in the request and is only used
    /// for error reporting. The size is stored under its canonical label.
    pub fn into_line_item(self, index: usize) -> Result<OrderLineItem, ValidationError> {
        let missing = |field| ValidationError::MissingField { index, field };

        let product_id = self.product_id.ok_or_else(|| missing("productId"))?;
        let product_variant_id = self
            .product_variant_id
            .ok_or_else(|| missing("productVariantId"))?;
        let product_name = self.product_name.ok_or_else(|| missing("productName"))?;
        let size = self.size.ok_or_else(|| missing("size"))?;
        let quantity = self.quantity.ok_or_else(|| missing("quantity"))?;
        let price = self.price.ok_or_else(|| missing("price"))?;

        if product_name.trim().is_empty() {
            return Err(ValidationError::EmptyProductName { index });
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
            .ok_or(ValidationError::InvalidQuantity { index, quantity })?;

        if price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice { index, price });
        }

        let size: Size = size
            .parse()
            .map_err(|size| ValidationError::UnknownSize { index, size })?;

        Ok(OrderLineItem::new(
            product_id,
            product_variant_id,
            product_name,
            size.as_str(),
            price,
            quantity,
        ))
    }
}
