//! User service trait, HTTP client and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{User, UserId};
use discovery::ServiceLocator;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{CollaboratorError, RemoteClient, Result};

/// Read access to the collaborator that owns users.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetches a user, failing with `NotFound` if it does not exist.
    async fn get_user(&self, id: UserId) -> Result<User>;
}

#[async_trait]
impl<T: UserService + ?Sized> UserService for Arc<T> {
    async fn get_user(&self, id: UserId) -> Result<User> {
        (**self).get_user(id).await
    }
}

/// User as it appears on the wire. Legacy deployments emit `ID`.
#[derive(Debug, Deserialize)]
struct UserPayload {
    #[serde(alias = "ID")]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    is_cafe_owner: bool,
}

/// User service reached over HTTP at `GET /users/{id}`.
#[derive(Clone)]
pub struct HttpUserService {
    client: RemoteClient,
}

impl HttpUserService {
    pub fn new(
        http: reqwest::Client,
        locator: Arc<dyn ServiceLocator>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            client: RemoteClient::new(http, locator, service),
        }
    }
}

#[async_trait]
impl UserService for HttpUserService {
    #[tracing::instrument(skip(self), fields(service = %self.client.service()))]
    async fn get_user(&self, id: UserId) -> Result<User> {
        let payload: UserPayload = self
            .client
            .get_json(&format!("/users/{id}"), &format!("user {id}"))
            .await?;

        Ok(User {
            id: UserId::new(payload.id),
            name: payload.name,
            email: payload.email,
            is_cafe_owner: payload.is_cafe_owner,
        })
    }
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    unavailable: bool,
    delay: Option<Duration>,
    request_count: usize,
}

/// In-memory user service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserService {
    state: Arc<RwLock<InMemoryUserState>>,
}

impl InMemoryUserService {
    /// Creates a new in-memory user service with no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub async fn insert(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Removes a user, returning true if it existed.
    pub async fn remove(&self, id: UserId) -> bool {
        self.state.write().await.users.remove(&id).is_some()
    }

    /// Makes every subsequent call fail as if the service could not be reached.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Delays every subsequent answer.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        self.state.write().await.delay = delay;
    }

    /// Returns how many lookups have been made.
    pub async fn request_count(&self) -> usize {
        self.state.read().await.request_count
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn get_user(&self, id: UserId) -> Result<User> {
        let delay = {
            let mut state = self.state.write().await;
            state.request_count += 1;
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.read().await;
        if state.unavailable {
            return Err(CollaboratorError::unavailable(
                "user-service",
                "connection refused",
            ));
        }
        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: format!("user {id}"),
            })
    }
}
