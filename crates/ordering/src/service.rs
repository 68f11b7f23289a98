//! Order service orchestrating validation, price snapshots and persistence.

use std::time::{Duration, Instant};

use collaborators::{MenuService, UserService};
use common::OrderId;
use futures_util::future::try_join_all;
use order_store::{NewOrder, Order, OrderStore};

use crate::{CreateOrder, EntityValidator, OrderError, snapshot_price};

/// Deadline applied to each collaborator lookup unless configured otherwise.
pub const DEFAULT_REMOTE_DEADLINE: Duration = Duration::from_secs(2);

/// Service for creating and reading orders.
///
/// An order is persisted only after the user and every referenced menu item
/// have been confirmed by their owners. Any failure before persistence leaves
/// no trace in the store.
pub struct OrderService<S, U, M> {
    store: S,
    validator: EntityValidator<U, M>,
}

impl<S, U, M> OrderService<S, U, M>
where
    S: OrderStore,
    U: UserService,
    M: MenuService,
{
    /// Creates a new order service using [`DEFAULT_REMOTE_DEADLINE`].
    pub fn new(store: S, users: U, menu: M) -> Self {
        Self::with_deadline(store, users, menu, DEFAULT_REMOTE_DEADLINE)
    }

    /// Creates a new order service with a custom collaborator deadline.
    pub fn with_deadline(store: S, users: U, menu: M, deadline: Duration) -> Self {
        Self {
            store,
            validator: EntityValidator::new(users, menu, deadline),
        }
    }

    /// Returns a reference to the underlying order store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a new order.
    ///
    /// The user is confirmed first, then all menu items are looked up
    /// concurrently. The first failing lookup aborts the others. Prices are
    /// snapshotted from the lookups, the order total is checked to fit, and
    /// the order is written with status `pending` in a single unit.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id, items = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self.try_create_order(cmd).await;
        metrics::histogram!("order_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => {
                metrics::counter!("orders_created_total").increment(1);
            }
            Err(err) => {
                metrics::counter!("order_create_failures_total", "reason" => err.reason())
                    .increment(1);
                tracing::warn!(error = %err, "order creation failed");
            }
        }
        result
    }

    async fn try_create_order(&self, cmd: CreateOrder) -> Result<Order, OrderError> {
        cmd.validate()?;

        self.validator.validate_user(cmd.user_id).await?;

        let items = try_join_all(cmd.items.iter().map(|line| async move {
            let menu_item = self.validator.validate_menu_item(line.menu_item_id).await?;
            Ok::<_, OrderError>(snapshot_price(line, &menu_item))
        }))
        .await?;

        let new_order = NewOrder::new(cmd.user_id, items);
        let total = new_order.total().ok_or_else(|| {
            OrderError::Validation(
                "order total exceeds the largest representable amount".to_string(),
            )
        })?;

        let order = self.store.persist(new_order).await?;
        tracing::info!(order_id = %order.id, %total, "order created");
        Ok(order)
    }

    /// Loads a single order with its items.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))
    }

    /// Loads every order with its items, oldest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.list().await?)
    }
}
