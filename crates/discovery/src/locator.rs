use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{DiscoveryError, Result};

/// How an endpoint was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Returned by a service registry as a healthy instance.
    Registry,
    /// Read from a statically configured table.
    Static,
    /// The registry could not produce an endpoint; the conventional address was used.
    Fallback,
}

/// A reachable base URL for a service, e.g. `http://10.0.0.7:8081`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    resolution: Resolution,
}

impl Endpoint {
    /// Creates an endpoint. A trailing slash on `base_url` is dropped.
    pub fn new(base_url: impl Into<String>, resolution: Resolution) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            resolution,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Joins `path` (which should start with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

/// Resolves a logical service name to an endpoint.
///
/// Implementations must not cache: callers rely on every call observing the
/// current state of whatever backs the locator.
#[async_trait]
pub trait ServiceLocator: Send + Sync {
    async fn resolve(&self, service: &str) -> Result<Endpoint>;
}

#[async_trait]
impl<T: ServiceLocator + ?Sized> ServiceLocator for Arc<T> {
    async fn resolve(&self, service: &str) -> Result<Endpoint> {
        (**self).resolve(service).await
    }
}

/// Locator backed by a fixed table of service name → base URL.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    table: HashMap<String, String>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the address for a service.
    pub fn with_service(mut self, service: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.table.insert(service.into(), base_url.into());
        self
    }

    /// Returns the configured address for a service, if any.
    pub fn lookup(&self, service: &str) -> Option<&str> {
        self.table.get(service).map(String::as_str)
    }
}

#[async_trait]
impl ServiceLocator for StaticLocator {
    async fn resolve(&self, service: &str) -> Result<Endpoint> {
        self.lookup(service)
            .map(|url| Endpoint::new(url, Resolution::Static))
            .ok_or_else(|| DiscoveryError::UnknownService(service.to_string()))
    }
}
