//! Shared HTTP plumbing for collaborator clients.

use std::sync::Arc;

use discovery::ServiceLocator;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{CollaboratorError, Result};

/// Issues JSON reads against a named collaborator.
///
/// The collaborator's address is resolved for every request, so a restarted
/// or relocated instance is picked up without restarting this process.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    locator: Arc<dyn ServiceLocator>,
    service: String,
}

impl RemoteClient {
    pub fn new(
        http: reqwest::Client,
        locator: Arc<dyn ServiceLocator>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            http,
            locator,
            service: service.into(),
        }
    }

    /// The logical name this client resolves.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// GETs `path` from the collaborator and decodes the JSON body.
    ///
    /// `resource` names the entity in `NotFound` errors (e.g. `"user 7"`).
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let result = self.fetch(path, resource).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        metrics::counter!(
            "collaborator_requests_total",
            "service" => self.service.clone(),
            "outcome" => outcome
        )
        .increment(1);
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let endpoint = self
            .locator
            .resolve(&self.service)
            .await
            .map_err(|e| CollaboratorError::unavailable(&self.service, e))?;

        let url = endpoint.url(path);
        tracing::debug!(service = %self.service, %url, resolution = ?endpoint.resolution(), "calling collaborator");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CollaboratorError::unavailable(&self.service, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CollaboratorError::NotFound {
                resource: resource.to_string(),
            });
        }
        if status.is_server_error() {
            return Err(CollaboratorError::unavailable(
                &self.service,
                format!("status {}", status.as_u16()),
            ));
        }
        if !status.is_success() {
            return Err(CollaboratorError::invalid_response(
                &self.service,
                format!("unexpected status {}", status.as_u16()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CollaboratorError::invalid_response(&self.service, e))
    }
}
