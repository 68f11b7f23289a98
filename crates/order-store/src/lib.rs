pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod store;

pub use common::{MenuItemId, Money, OrderId, OrderItemId, UserId};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, validate_new_order};
