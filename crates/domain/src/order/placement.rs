//! Order placement service.

use std::sync::Arc;
use std::time::Instant;

use chrono::{SubsecRound, Utc};
use common::OrderId;
use order_store::{NewOrder, OrderLineItem, OrderRepository};

use crate::catalog::CatalogLookup;
use crate::error::DomainError;

use super::{OrderPlacementRequest, ValidationError};

/// Where the unit price of a line item comes from.
#[derive(Clone, Default)]
pub enum PricingPolicy {
    /// Snapshot whatever price and size the caller submitted.
    #[default]
    TrustCaller,

    /// Reject items whose variant, size or price disagree with the catalog.
    VerifyWithCatalog(Arc<dyn CatalogLookup>),
}

impl std::fmt::Debug for PricingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingPolicy::TrustCaller => write!(f, "TrustCaller"),
            PricingPolicy::VerifyWithCatalog(_) => write!(f, "VerifyWithCatalog"),
        }
    }
}

/// Service that turns placement requests into persisted orders.
///
/// A request is validated and materialized completely before the repository
/// is touched, so a rejected request never leaves anything behind.
pub struct OrderPlacementService<R: OrderRepository> {
    repository: R,
    pricing: PricingPolicy,
}

impl<R: OrderRepository> OrderPlacementService<R> {
    /// Creates a placement service that trusts caller prices.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            pricing: PricingPolicy::default(),
        }
    }

    pub fn with_pricing_policy(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn pricing_policy(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Places an order and returns the ID the store assigned to it.
    ///
    /// The order is created in the `CREATED` state, dated now, with its total
    /// derived from the line items.
    #[tracing::instrument(
        skip(self, request),
        fields(user_id = %request.user_id, item_count = request.items.len())
    )]
    pub async fn place_order(&self, request: OrderPlacementRequest) -> Result<OrderId, DomainError> {
        let start = Instant::now();
        let result = self.place(request).await;
        metrics::histogram!("order_placement_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => metrics::counter!("orders_placed_total").increment(1),
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.kind()).increment(1);
                tracing::warn!(error = %e, "order rejected");
            }
        }

        result
    }

    async fn place(&self, request: OrderPlacementRequest) -> Result<OrderId, DomainError> {
        let OrderPlacementRequest { user_id, items } = request;

        if user_id.is_blank() {
            return Err(ValidationError::EmptyUserId.into());
        }
        if items.is_empty() {
            return Err(ValidationError::NoItems.into());
        }

        let mut line_items = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let line_item = item.into_line_item(index)?;
            if let PricingPolicy::VerifyWithCatalog(catalog) = &self.pricing {
                verify_with_catalog(catalog.as_ref(), index, &line_item).await?;
            }
            line_items.push(line_item);
        }

        // Stored timestamps keep microsecond precision
        let order_date = Utc::now().trunc_subsecs(6);
        let new_order =
            NewOrder::new(user_id, order_date, line_items).map_err(ValidationError::from)?;

        let order = self.repository.save(new_order).await?;

        tracing::info!(
            order_id = %order.id(),
            user_id = %order.user_id(),
            item_count = order.item_count(),
            total_amount = %order.total_amount(),
            "order placed"
        );

        Ok(order.id())
    }
}

async fn verify_with_catalog(
    catalog: &dyn CatalogLookup,
    index: usize,
    item: &OrderLineItem,
) -> Result<(), DomainError> {
    let entry = catalog
        .resolve_variant(item.product_id, item.product_variant_id)
        .await?
        .ok_or(ValidationError::UnknownVariant {
            index,
            product_id: item.product_id,
            variant_id: item.product_variant_id,
        })?;

    if entry.size.as_str() != item.size {
        return Err(ValidationError::SizeMismatch {
            index,
            expected: entry.size,
            actual: item.size.clone(),
        }
        .into());
    }
    if entry.unit_price != item.price {
        return Err(ValidationError::PriceMismatch {
            index,
            expected: entry.unit_price,
            actual: item.price,
        }
        .into());
    }

    Ok(())
}
