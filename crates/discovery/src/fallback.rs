//! Hybrid strategy: primary locator, then conventional addresses.

use async_trait::async_trait;

use crate::{Endpoint, Resolution, Result, ServiceLocator, StaticLocator};

/// Wraps a primary locator (normally a registry) with a table of conventional
/// addresses.
///
/// Any failure of the primary for a service that has a conventional address
/// yields that address with [`Resolution::Fallback`]. The primary's error is
/// returned unchanged for services with no conventional address.
#[derive(Debug, Clone)]
pub struct FallbackLocator<P> {
    primary: P,
    fallbacks: StaticLocator,
}

impl<P: ServiceLocator> FallbackLocator<P> {
    pub fn new(primary: P, fallbacks: StaticLocator) -> Self {
        Self { primary, fallbacks }
    }
}

#[async_trait]
impl<P: ServiceLocator> ServiceLocator for FallbackLocator<P> {
    async fn resolve(&self, service: &str) -> Result<Endpoint> {
        let err = match self.primary.resolve(service).await {
            Ok(endpoint) => return Ok(endpoint),
            Err(err) => err,
        };

        match self.fallbacks.lookup(service) {
            Some(url) => {
                tracing::warn!(
                    service,
                    fallback = url,
                    error = %err,
                    "primary discovery failed, using conventional address"
                );
                metrics::counter!("discovery_fallbacks_total", "service" => service.to_string())
                    .increment(1);
                Ok(Endpoint::new(url, Resolution::Fallback))
            }
            None => Err(err),
        }
    }
}
