//! The order aggregate as stored and returned by the store.

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{MenuItemId, Money, OrderId, OrderItemId, StoreError, UserId};

/// Lifecycle status of an order.
///
/// Orders are always created `Pending`; moving them to `Completed` happens
/// elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl OrderStatus {
    /// Returns the status as stored and published.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(StoreError::Corrupt(format!("unknown order status '{other}'"))),
        }
    }
}

/// One line of a persisted order.
///
/// `price` is the menu item's price observed when the order was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns quantity * snapshot price, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

/// A persisted order together with its items, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of all line totals, or `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        sum_lines(self.items.iter().map(OrderItem::line_total))
    }
}

/// An item ready to be persisted: what was ordered and the price captured for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Money,
}

impl NewOrderItem {
    pub fn new(menu_item_id: MenuItemId, quantity: u32, price: Money) -> Self {
        Self {
            menu_item_id,
            quantity,
            price,
        }
    }
    /// Returns quantity * captured price, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

/// An order that has passed validation but has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(user_id: UserId, items: Vec<NewOrderItem>) -> Self {
        Self { user_id, items }
    }

    /// Sum of all line totals, or `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        sum_lines(self.items.iter().map(NewOrderItem::line_total))
    }

    /// Assigns identifiers and timestamps, producing the aggregate to store.
    ///
    /// Timestamps are truncated to microseconds, the precision Postgres keeps,
    /// so the returned order equals the one read back later.
    pub(crate) fn into_order(self) -> Order {
        let now = Utc::now().trunc_subsecs(6);
        let order_id = OrderId::new();
        let items = self
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: OrderItemId::new(),
                order_id,
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Order {
            id: order_id,
            user_id: self.user_id,
            status: OrderStatus::Pending,
            items,
            created_at: now,
            updated_at: now,
        }
    }
}

fn sum_lines(lines: impl Iterator<Item = Option<Money>>) -> Option<Money> {
    lines.fold(Some(Money::zero()), |acc, line| acc?.checked_add(line?))
}
