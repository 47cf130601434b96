//! Order history queries.

use common::{OrderId, UserId};
use order_store::OrderRepository;

use crate::error::DomainError;

use super::{OrderSummary, ValidationError};

/// Read-only access to the orders a user has placed.
pub struct OrderQueryService<R: OrderRepository> {
    repository: R,
}

impl<R: OrderRepository> OrderQueryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns every order of a user, newest first.
    ///
    /// A user who never ordered gets an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_orders(&self, user_id: &UserId) -> Result<Vec<OrderSummary>, DomainError> {
        if user_id.is_blank() {
            return Err(ValidationError::EmptyUserId.into());
        }

        let orders = self.repository.find_all_by_user(user_id).await?;
        tracing::debug!(count = orders.len(), "loaded order history");

        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    /// Returns one order if it exists and belongs to `user_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_order(
        &self,
        user_id: &UserId,
        id: OrderId,
    ) -> Result<Option<OrderSummary>, DomainError> {
        if user_id.is_blank() {
            return Err(ValidationError::EmptyUserId.into());
        }

        let order = self.repository.find_by_id(id).await?;

        Ok(order
            .filter(|order| order.user_id() == user_id)
            .map(OrderSummary::from))
    }
}
