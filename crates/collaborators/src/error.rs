//! Collaborator error types.

use thiserror::Error;

/// Errors returned by collaborator clients.
///
/// Semantic absence ([`CollaboratorError::NotFound`]) and failure to get an
/// answer at all ([`CollaboratorError::Unavailable`]) are kept apart: the
/// first is final, the second may succeed if the caller tries again later.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator answered and the entity does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The collaborator could not be resolved or reached, or failed internally.
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    /// The collaborator answered with something that cannot be interpreted.
    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },
}

impl CollaboratorError {
    pub fn unavailable(service: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unavailable {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_response(service: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidResponse {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if repeating the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }
}

/// Convenience type alias for collaborator results.
pub type Result<T> = std::result::Result<T, CollaboratorError>;
