//! Order error types and their downstream categories.

use collaborators::CollaboratorError;
use common::{MenuItemId, OrderId, UserId};
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur while creating or reading orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is malformed or incomplete.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The referenced user does not exist.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// A referenced menu item does not exist.
    #[error("Menu item {0} not found")]
    MenuItemNotFound(MenuItemId),

    /// A collaborator could not be resolved, reached, or did not answer in time.
    #[error("Dependency {service} unavailable: {reason}")]
    DependencyUnavailable { service: String, reason: String },

    /// A collaborator answered with data that cannot be used.
    #[error("Invalid response from {service}: {reason}")]
    InvalidDependencyResponse { service: String, reason: String },

    /// The requested order does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// Writing or reading orders failed.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Failure categories understood at the service boundary.
///
/// The set mirrors the status codes of common RPC systems so a gateway can map
/// them to transport-level outcomes without knowing about individual errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    InvalidArgument,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    FailedPrecondition,
    Unimplemented,
    Unavailable,
    Unknown,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 9] = [
        ErrorCategory::NotFound,
        ErrorCategory::InvalidArgument,
        ErrorCategory::AlreadyExists,
        ErrorCategory::PermissionDenied,
        ErrorCategory::Unauthenticated,
        ErrorCategory::FailedPrecondition,
        ErrorCategory::Unimplemented,
        ErrorCategory::Unavailable,
        ErrorCategory::Unknown,
    ];
}

impl OrderError {
    /// Builds the error for a collaborator failure other than `NotFound`,
    /// which callers translate themselves because only they know what was missing.
    pub(crate) fn from_collaborator(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unavailable { service, reason } => {
                OrderError::DependencyUnavailable { service, reason }
            }
            CollaboratorError::InvalidResponse { service, reason } => {
                OrderError::InvalidDependencyResponse { service, reason }
            }
            CollaboratorError::NotFound { resource } => OrderError::InvalidDependencyResponse {
                service: "collaborator".to_string(),
                reason: format!("unexpected not found for {resource}"),
            },
        }
    }

    /// Returns the boundary category for this error.
    ///
    /// Missing references are the caller's mistake and surface as invalid
    /// arguments; only a missing order is `NotFound`.
    pub fn category(&self) -> ErrorCategory {
        match self {
            OrderError::Validation(_)
            | OrderError::UserNotFound(_)
            | OrderError::MenuItemNotFound(_) => ErrorCategory::InvalidArgument,
            OrderError::OrderNotFound(_) => ErrorCategory::NotFound,
            OrderError::DependencyUnavailable { .. } => ErrorCategory::Unavailable,
            OrderError::InvalidDependencyResponse { .. } | OrderError::Persistence(_) => {
                ErrorCategory::Unknown
            }
        }
    }

    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "validation",
            OrderError::UserNotFound(_) | OrderError::MenuItemNotFound(_) => "reference_not_found",
            OrderError::DependencyUnavailable { .. } => "dependency_unavailable",
            OrderError::InvalidDependencyResponse { .. } => "invalid_dependency_response",
            OrderError::OrderNotFound(_) => "order_not_found",
            OrderError::Persistence(_) => "persistence",
        }
    }
}
