pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod store;

pub use common::{OrderId, ProductId, UserId, VariantId};
pub use error::{ModelError, Result, StoreError};
pub use memory::InMemoryOrderRepository;
pub use order::{NewOrder, Order, OrderLineItem, OrderStatus, compute_total};
pub use postgres::PostgresOrderRepository;
pub use store::{OrderRepository, OrderRepositoryExt, newest_first};
