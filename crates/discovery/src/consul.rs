//! Consul health-API backed locator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{DiscoveryError, Endpoint, Resolution, Result, ServiceLocator};

const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct HealthEntry {
    #[serde(rename = "Node")]
    node: Option<NodeInfo>,
    #[serde(rename = "Service")]
    service: ServiceInfo,
}

#[derive(Debug, Deserialize)]
struct NodeInfo {
    #[serde(rename = "Address", default)]
    address: String,
}

#[derive(Debug, Deserialize)]
struct ServiceInfo {
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
}

/// Resolves services through Consul's health endpoint, keeping only instances
/// whose checks are passing.
///
/// When several instances are healthy the first one in the registry's answer
/// is used. No balancing is attempted.
#[derive(Debug, Clone)]
pub struct ConsulLocator {
    client: reqwest::Client,
    registry_url: String,
    timeout: Duration,
}

impl ConsulLocator {
    /// Creates a locator for the registry at `registry_url` (e.g. `http://consul:8500`).
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry_url: registry_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_REGISTRY_TIMEOUT,
        }
    }

    /// Bounds each registry lookup.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shares an existing HTTP client (and its connection pool).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn health_url(&self, service: &str) -> Result<Url> {
        let mut url = registry_endpoint(
            &self.registry_url,
            &["v1", "health", "service", service],
        )?;
        url.set_query(Some("passing=true"));
        Ok(url)
    }
}

/// Appends `segments` to the registry base URL, escaping each one so a name
/// cannot add path segments or a query of its own.
pub(crate) fn registry_endpoint(registry_url: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |reason: String| DiscoveryError::InvalidRegistryUrl {
        url: registry_url.to_string(),
        reason,
    };

    let mut url = Url::parse(registry_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl ServiceLocator for ConsulLocator {
    #[tracing::instrument(skip(self), fields(registry = %self.registry_url))]
    async fn resolve(&self, service: &str) -> Result<Endpoint> {
        let response = self
            .client
            .get(self.health_url(service)?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| DiscoveryError::RegistryUnreachable {
                service: service.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::RegistryStatus {
                service: service.to_string(),
                status: response.status().as_u16(),
            });
        }

        let entries: Vec<HealthEntry> =
            response
                .json()
                .await
                .map_err(|e| DiscoveryError::InvalidRegistryResponse {
                    service: service.to_string(),
                    reason: e.to_string(),
                })?;

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NoHealthyInstances(service.to_string()))?;

        // Consul leaves the service address empty when the service shares the node's.
        let address = if entry.service.address.is_empty() {
            entry.node.map(|n| n.address).unwrap_or_default()
        } else {
            entry.service.address
        };
        if address.is_empty() {
            return Err(DiscoveryError::InvalidRegistryResponse {
                service: service.to_string(),
                reason: "instance has no address".to_string(),
            });
        }

        let endpoint = Endpoint::new(
            format!("http://{}:{}", address, entry.service.port),
            Resolution::Registry,
        );
        tracing::debug!(%endpoint, "resolved via registry");
        Ok(endpoint)
    }
}
