use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    NewOrder, Order, OrderId, Result, StoreError, UserId,
    store::{OrderRepository, newest_first},
};

/// Faults armed for the next save only.
#[derive(Debug, Default)]
struct FaultPlan {
    reject_next_save: bool,
    fail_after_items: Option<usize>,
}

#[derive(Debug, Default)]
struct MemoryState {
    orders: Vec<Order>,
    last_id: i64,
    faults: FaultPlan,
}

/// In-memory order store implementation for testing and local runs.
///
/// A save stages the whole aggregate and publishes it under a single write
/// lock, so readers see either the complete order or nothing. Faults can be
/// armed to simulate a store failing part-way through a save.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the total number of line items stored across all orders.
    pub async fn item_count(&self) -> usize {
        self.state
            .read()
            .await
            .orders
            .iter()
            .map(Order::item_count)
            .sum()
    }

    /// Makes the next save fail before anything is written.
    pub async fn fail_next_save(&self) {
        self.state.write().await.faults.reject_next_save = true;
    }

    /// Makes the next save fail after `written` items have been staged.
    pub async fn fail_after_items(&self, written: usize) {
        self.state.write().await.faults.fail_after_items = Some(written);
    }

    /// Clears all orders and armed faults.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.orders.clear();
        state.last_id = 0;
        state.faults = FaultPlan::default();
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        let faults = std::mem::take(&mut state.faults);

        if faults.reject_next_save {
            return Err(StoreError::Unavailable(
                "simulated fault before the order row was written".to_string(),
            ));
        }

        let order_id = OrderId::new(state.last_id + 1);

        // Stage items one by one, like row inserts inside a transaction.
        let mut staged = Vec::with_capacity(order.items().len());
        for (position, item) in order.items().iter().enumerate() {
            if faults.fail_after_items.is_some_and(|limit| position >= limit) {
                tracing::debug!(%order_id, position, "simulated fault, discarding staged items");
                return Err(StoreError::Unavailable(format!(
                    "simulated fault while writing item {position} of order {order_id}"
                )));
            }
            staged.push(item.clone());
        }

        let persisted = Order::restore(
            order_id,
            order.user_id().clone(),
            order.status(),
            order.order_date(),
            order.total_amount(),
            staged,
        );

        // Commit
        state.last_id = order_id.as_i64();
        state.orders.push(persisted.clone());

        Ok(persisted)
    }

    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .iter()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        orders.sort_by(newest_first);
        Ok(orders)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id() == id).cloned())
    }
}
