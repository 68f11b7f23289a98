//! Self-registration with a Consul agent.

use std::time::Duration;

use serde::Serialize;

use crate::consul::registry_endpoint;
use crate::{DiscoveryError, Result};

const CHECK_INTERVAL: &str = "10s";
const CHECK_TIMEOUT: &str = "3s";

/// Describes this process to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub health_path: String,
}

impl ServiceRegistration {
    /// Creates a registration whose ID is `<name>-<address>` and whose health
    /// check targets `/health`.
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        let name = name.into();
        let address = address.into();
        Self {
            id: format!("{name}-{address}"),
            name,
            address,
            port,
            health_path: "/health".to_string(),
        }
    }
}

#[derive(Serialize)]
struct RegistrationPayload<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "Check")]
    check: CheckPayload,
}

#[derive(Serialize)]
struct CheckPayload {
    #[serde(rename = "HTTP")]
    http: String,
    #[serde(rename = "Interval")]
    interval: &'static str,
    #[serde(rename = "Timeout")]
    timeout: &'static str,
}

/// Registers and deregisters services with a Consul agent.
#[derive(Debug, Clone)]
pub struct ConsulRegistrar {
    client: reqwest::Client,
    registry_url: String,
    timeout: Duration,
}

impl ConsulRegistrar {
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry_url: registry_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers the service along with an HTTP health check.
    #[tracing::instrument(skip(self, registration), fields(service_id = %registration.id))]
    pub async fn register(&self, registration: &ServiceRegistration) -> Result<()> {
        let payload = RegistrationPayload {
            id: &registration.id,
            name: &registration.name,
            address: &registration.address,
            port: registration.port,
            check: CheckPayload {
                http: format!(
                    "http://{}:{}{}",
                    registration.address, registration.port, registration.health_path
                ),
                interval: CHECK_INTERVAL,
                timeout: CHECK_TIMEOUT,
            },
        };

        let url = registry_endpoint(
            &self.registry_url,
            &["v1", "agent", "service", "register"],
        )?;
        let request = self.client.put(url).json(&payload);
        self.send(&registration.id, request).await?;
        tracing::info!(name = %registration.name, "registered with service registry");
        Ok(())
    }

    /// Removes a previously registered service.
    #[tracing::instrument(skip(self))]
    pub async fn deregister(&self, service_id: &str) -> Result<()> {
        let url = registry_endpoint(
            &self.registry_url,
            &["v1", "agent", "service", "deregister", service_id],
        )?;
        self.send(service_id, self.client.put(url)).await?;
        tracing::info!("deregistered from service registry");
        Ok(())
    }

    async fn send(&self, service_id: &str, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.timeout(self.timeout).send().await.map_err(|e| {
            DiscoveryError::Registration {
                service_id: service_id.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Registration {
                service_id: service_id.to_string(),
                reason: format!("registry returned status {}", response.status().as_u16()),
            });
        }
        Ok(())
    }
}
