use thiserror::Error;

use crate::MenuItemId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order must contain at least one item.
    #[error("Cannot persist an order without items")]
    EmptyOrder,

    /// Every item must be ordered at least once.
    #[error("Invalid quantity {quantity} for menu item {menu_item_id}")]
    InvalidQuantity {
        menu_item_id: MenuItemId,
        quantity: u32,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back to the domain.
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
