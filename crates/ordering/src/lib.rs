//! Order creation for the cafe order service.
//!
//! This crate provides:
//! - `CreateOrder` command with request validation
//! - `EntityValidator` confirming users and menu items against their owning
//!   collaborators, each call bounded by a deadline
//! - `snapshot_price` capturing a menu item's price into an order line
//! - `OrderService` orchestrating validation, snapshotting and persistence
//! - `OrderError` and its mapping onto `ErrorCategory`

pub mod command;
pub mod error;
pub mod service;
pub mod snapshot;
pub mod validator;

pub use command::{CreateOrder, LineItem};
pub use error::{ErrorCategory, OrderError};
pub use order_store::{Order, OrderItem, OrderStatus};
pub use service::{DEFAULT_REMOTE_DEADLINE, OrderService};
pub use snapshot::snapshot_price;
pub use validator::EntityValidator;
