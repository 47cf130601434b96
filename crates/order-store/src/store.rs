use std::cmp::Ordering;

use async_trait::async_trait;

use crate::{NewOrder, Order, OrderId, Result, UserId};

/// Core trait for order store implementations.
///
/// A store persists whole order aggregates. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and all of its line items as one atomic unit.
    ///
    /// Either the order and every item become visible together, or nothing
    /// does. Returns the persisted order carrying its store-assigned ID.
    async fn save(&self, order: NewOrder) -> Result<Order>;

    /// Retrieves every order placed by a user, newest first.
    ///
    /// Orders sharing an `order_date` are ordered by descending ID, so the
    /// most recently saved one still comes first. Items keep the order in
    /// which they were submitted.
    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Order>>;

    /// Retrieves a single order by ID.
    ///
    /// Returns None if no such order exists.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderRepositoryExt: OrderRepository {
    /// Counts the orders placed by a user.
    async fn count_for_user(&self, user_id: &UserId) -> Result<usize> {
        Ok(self.find_all_by_user(user_id).await?.len())
    }
}

// Blanket implementation for all OrderRepository implementations
impl<T: OrderRepository + ?Sized> OrderRepositoryExt for T {}

/// Ordering used by `find_all_by_user`: order date descending, then ID descending.
pub fn newest_first(a: &Order, b: &Order) -> Ordering {
    b.order_date()
        .cmp(&a.order_date())
        .then_with(|| b.id().cmp(&a.id()))
}
