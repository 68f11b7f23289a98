//! Types shared by every crate of the order service.
//!
//! Orders and order items are owned here and identified by UUIDs generated at
//! persistence time. Users and menu items are owned by remote collaborators and
//! are only ever referenced by their integer identifiers.

pub mod entities;
pub mod money;
pub mod types;

pub use entities::{MenuItem, User};
pub use money::Money;
pub use types::{MenuItemId, OrderId, OrderItemId, UserId};
