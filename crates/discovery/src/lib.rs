//! Resolves logical service names to reachable HTTP endpoints.
//!
//! Three strategies implement [`ServiceLocator`]:
//! - [`StaticLocator`]: a fixed name → URL table
//! - [`ConsulLocator`]: healthy instances from a Consul registry, first one wins
//! - [`FallbackLocator`]: any locator, backed by a static table of conventional
//!   addresses used when the primary cannot produce an endpoint
//!
//! Nothing is cached. Every call re-resolves, so two calls made while handling
//! the same request may land on different instances.

pub mod consul;
pub mod error;
pub mod fallback;
pub mod locator;
pub mod registration;

pub use consul::ConsulLocator;
pub use error::{DiscoveryError, Result};
pub use fallback::FallbackLocator;
pub use locator::{Endpoint, Resolution, ServiceLocator, StaticLocator};
pub use registration::{ConsulRegistrar, ServiceRegistration};
