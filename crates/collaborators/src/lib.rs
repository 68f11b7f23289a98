//! Clients for the collaborators that own users and menu items.
//!
//! Each collaborator is described by a trait with two implementations:
//! an HTTP client that resolves the collaborator through a
//! [`discovery::ServiceLocator`] on every call, and an in-memory double for
//! tests. All calls are reads; none of them has side effects.

pub mod error;
pub mod http;
pub mod menu;
pub mod user;

pub use error::{CollaboratorError, Result};
pub use http::RemoteClient;
pub use menu::{HttpMenuService, InMemoryMenuService, MenuService};
pub use user::{HttpUserService, InMemoryUserService, UserService};
