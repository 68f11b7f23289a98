use std::sync::Arc;

use async_trait::async_trait;

use crate::{NewOrder, Order, OrderId, Result, StoreError};

/// Core trait for order store implementations.
///
/// A store owns identifier and timestamp assignment. All implementations
/// must be thread-safe (Send + Sync) and must give every persisted order a
/// distinct identifier, however many callers persist concurrently.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes an order and all of its items as one unit.
    ///
    /// Either the whole aggregate becomes visible or nothing does. The
    /// returned order has status `pending`.
    async fn persist(&self, order: NewOrder) -> Result<Order>;

    /// Retrieves an order with its items.
    ///
    /// Returns None if the order doesn't exist.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Retrieves every order with its items, oldest first.
    async fn list(&self) -> Result<Vec<Order>>;

    /// Returns the number of stored orders.
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn persist(&self, order: NewOrder) -> Result<Order> {
        (**self).persist(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Order>> {
        (**self).list().await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}

/// Validates an order before persisting.
pub fn validate_new_order(order: &NewOrder) -> Result<()> {
    if order.items.is_empty() {
        return Err(StoreError::EmptyOrder);
    }

    if let Some(item) = order.items.iter().find(|i| i.quantity == 0) {
        return Err(StoreError::InvalidQuantity {
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
        });
    }

    Ok(())
}
