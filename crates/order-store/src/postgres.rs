use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    NewOrder, Order, OrderId, OrderLineItem, OrderStatus, ProductId, Result, StoreError, UserId,
    VariantId, store::OrderRepository,
};

const ORDER_COLUMNS: &str = "id, user_id, status, order_date, total_amount";
const ITEM_COLUMNS: &str =
    "order_id, product_id, product_variant_id, product_name, size, price, quantity";

/// PostgreSQL-backed order store implementation.
///
/// Orders live in `orders`, their items in `order_items` keyed by `order_id`
/// and `position`.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_item(row: &PgRow) -> Result<OrderLineItem> {
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| StoreError::InvalidRow {
            table: "order_items",
            reason: format!("negative quantity {quantity}"),
        })?;

        Ok(OrderLineItem {
            product_id: ProductId::new(row.try_get("product_id")?),
            product_variant_id: VariantId::new(row.try_get("product_variant_id")?),
            product_name: row.try_get("product_name")?,
            size: row.try_get("size")?,
            price: row.try_get::<Decimal, _>("price")?,
            quantity,
        })
    }

    fn row_to_order(row: PgRow, items: Vec<OrderLineItem>) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::InvalidRow {
                table: "orders",
                reason: e.to_string(),
            })?;

        Ok(Order::restore(
            OrderId::new(row.try_get("id")?),
            UserId::new(row.try_get::<String, _>("user_id")?),
            status,
            row.try_get::<DateTime<Utc>, _>("order_date")?,
            row.try_get::<Decimal, _>("total_amount")?,
            items,
        ))
    }

    /// Loads the items of the given orders, grouped by order and in position order.
    async fn load_items(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<OrderLineItem>>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id ASC, position ASC"
        ))
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<OrderLineItem>> = HashMap::new();
        for row in &rows {
            let order_id: i64 = row.try_get("order_id")?;
            grouped
                .entry(order_id)
                .or_default()
                .push(Self::row_to_item(row)?);
        }
        Ok(grouped)
    }

    async fn attach_items(&self, rows: Vec<PgRow>) -> Result<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut items = self.load_items(&order_ids).await?;

        rows.into_iter()
            .zip(order_ids)
            .map(|(row, id)| Self::row_to_order(row, items.remove(&id).unwrap_or_default()))
            .collect()
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(user_id = %order.user_id(), items = order.items().len()))]
    async fn save(&self, order: NewOrder) -> Result<Order> {
        let started = Instant::now();

        // Dropping the transaction without commit rolls everything back
        let mut tx = self.pool.begin().await?;

        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (user_id, status, order_date, total_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order.user_id().as_str())
        .bind(order.status().as_str())
        .bind(order.order_date())
        .bind(order.total_amount())
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in order.items().iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| StoreError::OutOfRange(format!("item position {position}")))?;
            let quantity = i32::try_from(item.quantity)
                .map_err(|_| StoreError::OutOfRange(format!("quantity {}", item.quantity)))?;

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, product_id, product_variant_id, product_name, size, price, quantity)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(order_id)
            .bind(position)
            .bind(item.product_id.as_i64())
            .bind(item.product_variant_id.as_i64())
            .bind(&item.product_name)
            .bind(&item.size)
            .bind(item.price)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        metrics::histogram!("order_store_save_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(order.into_order(OrderId::new(order_id)))
    }

    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC, id DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}
