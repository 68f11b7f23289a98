use thiserror::Error;

/// Errors that can occur while resolving or registering a service.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The registry could not be reached (connection failure or timeout).
    #[error("Registry unreachable while resolving {service}: {source}")]
    RegistryUnreachable {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with a non-success status.
    #[error("Registry returned status {status} while resolving {service}")]
    RegistryStatus { service: String, status: u16 },

    /// The registry answered with a body that could not be decoded.
    #[error("Invalid registry response for {service}: {reason}")]
    InvalidRegistryResponse { service: String, reason: String },

    /// The registry knows the service but none of its instances is passing health checks.
    #[error("No healthy instances of {0}")]
    NoHealthyInstances(String),

    /// The configured registry address is not a usable base URL.
    #[error("Invalid registry URL {url}: {reason}")]
    InvalidRegistryUrl { url: String, reason: String },

    /// A static table has no entry for the service.
    #[error("No address configured for {0}")]
    UnknownService(String),

    /// Registering or deregistering this process with the registry failed.
    #[error("Registration of {service_id} failed: {reason}")]
    Registration { service_id: String, reason: String },
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
