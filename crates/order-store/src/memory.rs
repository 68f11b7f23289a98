use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    NewOrder, Order, OrderId, Result, StoreError,
    store::{OrderStore, validate_new_order},
};

#[derive(Debug, Default)]
struct InMemoryState {
    orders: Vec<Order>,
    fail_on_persist: bool,
}

/// In-memory order store implementation for testing.
///
/// This implementation stores all orders in memory and provides
/// the same interface as the PostgreSQL implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent persist fail with a database error.
    pub async fn set_fail_on_persist(&self, fail: bool) {
        self.state.write().await.fail_on_persist = fail;
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn persist(&self, order: NewOrder) -> Result<Order> {
        validate_new_order(&order)?;

        let mut state = self.state.write().await;
        if state.fail_on_persist {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let order = order.into_order();
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        Ok(self.state.read().await.orders.clone())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.state.read().await.orders.len() as u64)
    }
}
