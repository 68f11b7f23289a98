//! Menu service trait, HTTP client and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{MenuItem, MenuItemId, Money};
use discovery::ServiceLocator;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{CollaboratorError, RemoteClient, Result};

/// Read access to the collaborator that owns menu items and their prices.
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Fetches a menu item with its current price.
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem>;
}

#[async_trait]
impl<T: MenuService + ?Sized> MenuService for Arc<T> {
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem> {
        (**self).get_menu_item(id).await
    }
}

#[derive(Debug, Deserialize)]
struct MenuItemPayload {
    #[serde(alias = "ID")]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
}

/// Menu service reached over HTTP at `GET /menu/{id}`.
#[derive(Clone)]
pub struct HttpMenuService {
    client: RemoteClient,
}

impl HttpMenuService {
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
impl MenuService for HttpMenuService {
    #[tracing::instrument(skip(self), fields(service = %self.client.service()))]
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem> {
        let payload: MenuItemPayload = self
            .client
            .get_json(&format!("/menu/{id}"), &format!("menu item {id}"))
            .await?;

        let price = Money::from_decimal(payload.price).ok_or_else(|| {
            CollaboratorError::invalid_response(
                self.client.service(),
                format!("menu item {id} has unusable price {}", payload.price),
            )
        })?;

        Ok(MenuItem {
            id: MenuItemId::new(payload.id),
            name: payload.name,
            description: payload.description,
            price,
        })
    }
}

#[derive(Debug, Default)]
struct InMemoryMenuState {
    items: HashMap<MenuItemId, MenuItem>,
    unavailable: bool,
    delay: Option<Duration>,
    request_count: usize,
}

/// In-memory menu service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMenuService {
    state: Arc<RwLock<InMemoryMenuState>>,
}

impl InMemoryMenuService {
    /// Creates a new in-memory menu service with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a menu item.
    pub async fn insert(&self, item: MenuItem) {
        self.state.write().await.items.insert(item.id, item);
    }

    /// Changes the current price of an item. Returns false if the item does not exist.
    pub async fn set_price(&self, id: MenuItemId, price: Money) -> bool {
        match self.state.write().await.items.get_mut(&id) {
            Some(item) => {
                item.price = price;
                true
            }
            None => false,
        }
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
impl MenuService for InMemoryMenuService {
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem> {
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
                "menu-service",
                "connection refused",
            ));
        }
        state
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound {
                resource: format!("menu item {id}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> MenuItem {
        MenuItem::new(MenuItemId::new(1), "Coffee", Money::from_cents(250))
    }

    #[tokio::test]
    async fn test_get_item_returns_current_price() {
        let service = InMemoryMenuService::new();
        service.insert(coffee()).await;

        assert_eq!(
            service.get_menu_item(MenuItemId::new(1)).await.unwrap().price,
            Money::from_cents(250)
        );

        assert!(service.set_price(MenuItemId::new(1), Money::from_cents(300)).await);
        assert_eq!(
            service.get_menu_item(MenuItemId::new(1)).await.unwrap().price,
            Money::from_cents(300)
        );
    }

    #[tokio::test]
    async fn test_set_price_on_missing_item() {
        let service = InMemoryMenuService::new();
        assert!(!service.set_price(MenuItemId::new(9), Money::from_cents(1)).await);
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let service = InMemoryMenuService::new();

        let err = service.get_menu_item(MenuItemId::new(5)).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::NotFound { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_payload_reads_decimal_price() {
        let payload: MenuItemPayload =
            serde_json::from_str(r#"{"id": 2, "name": "Bagel", "price": 5.0}"#).unwrap();
        assert_eq!(payload.id, 2);
        assert_eq!(payload.description, "");
        assert_eq!(Money::from_decimal(payload.price), Some(Money::from_cents(500)));
    }
}
