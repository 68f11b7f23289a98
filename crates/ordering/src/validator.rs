//! Reference validation against the collaborators that own users and menu items.

use std::future::Future;
use std::time::Duration;

use collaborators::{CollaboratorError, MenuService, UserService};
use common::{MenuItem, MenuItemId, User, UserId};

use crate::OrderError;

const USER_DEPENDENCY: &str = "user service";
const MENU_DEPENDENCY: &str = "menu service";

/// Confirms that referenced users and menu items exist.
///
/// Every lookup, including the locator resolution the clients perform, is
/// bounded by `deadline`. A lookup that does not finish in time is reported
/// as an unavailable dependency, never as a missing entity.
pub struct EntityValidator<U, M> {
    users: U,
    menu: M,
    deadline: Duration,
}

impl<U: UserService, M: MenuService> EntityValidator<U, M> {
    pub fn new(users: U, menu: M, deadline: Duration) -> Self {
        Self {
            users,
            menu,
            deadline,
        }
    }

    /// Fetches the user or explains why it cannot be used.
    #[tracing::instrument(skip(self))]
    pub async fn validate_user(&self, id: UserId) -> Result<User, OrderError> {
        let user = match self.bounded(USER_DEPENDENCY, self.users.get_user(id)).await? {
            Ok(user) => user,
            Err(CollaboratorError::NotFound { .. }) => return Err(OrderError::UserNotFound(id)),
            Err(err) => return Err(OrderError::from_collaborator(err)),
        };

        if user.id != id {
            return Err(OrderError::InvalidDependencyResponse {
                service: USER_DEPENDENCY.to_string(),
                reason: format!("asked for user {id}, got user {}", user.id),
            });
        }
        Ok(user)
    }

    /// Fetches the menu item, including its current price.
    #[tracing::instrument(skip(self))]
    pub async fn validate_menu_item(&self, id: MenuItemId) -> Result<MenuItem, OrderError> {
        let item = match self.bounded(MENU_DEPENDENCY, self.menu.get_menu_item(id)).await? {
            Ok(item) => item,
            Err(CollaboratorError::NotFound { .. }) => {
                return Err(OrderError::MenuItemNotFound(id));
            }
            Err(err) => return Err(OrderError::from_collaborator(err)),
        };

        if item.id != id {
            return Err(OrderError::InvalidDependencyResponse {
                service: MENU_DEPENDENCY.to_string(),
                reason: format!("asked for menu item {id}, got menu item {}", item.id),
            });
        }
        Ok(item)
    }

    async fn bounded<T>(
        &self,
        dependency: &str,
        call: impl Future<Output = T>,
    ) -> Result<T, OrderError> {
        tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| {
                tracing::warn!(
                    dependency,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "deadline exceeded"
                );
                OrderError::DependencyUnavailable {
                    service: dependency.to_string(),
                    reason: format!("no answer within {}ms", self.deadline.as_millis()),
                }
            })
    }
}
