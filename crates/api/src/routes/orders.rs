//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use collaborators::{MenuService, UserService};
use common::OrderId;
use order_store::{Order, OrderItem, OrderStore};
use ordering::{CreateOrder, LineItem, OrderService};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// User collaborator shared by all handlers.
pub type SharedUserService = Arc<dyn UserService>;
/// Menu collaborator shared by all handlers.
pub type SharedMenuService = Arc<dyn MenuService>;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S, SharedUserService, SharedMenuService>,
}

impl<S: OrderStore> AppState<S> {
    pub fn new(order_service: OrderService<S, SharedUserService, SharedMenuService>) -> Self {
        Self { order_service }
    }
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: i64,
    pub quantity: u32,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(req: CreateOrderRequest) -> Self {
        CreateOrder::new(
            req.user_id,
            req.items
                .into_iter()
                .map(|item| LineItem::new(item.menu_item_id, item.quantity))
                .collect(),
        )
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: i64,
    pub status: String,
    pub order_items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: i64,
    pub quantity: u32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id.to_string(),
            order_id: item.order_id.to_string(),
            menu_item_id: item.menu_item_id.get(),
            quantity: item.quantity,
            price: item.price.as_decimal(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.get(),
            status: order.status.to_string(),
            order_items: order.items.iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// -- Handlers --

/// POST /orders: validate references, snapshot prices and persist.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) =
        payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let order = state.order_service.create_order(req.into()).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/{id}: a single order with its items.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.order_service.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders: every order with its items.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list_orders().await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    uuid::Uuid::parse_str(id)
        .map(OrderId::from_uuid)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))
}
