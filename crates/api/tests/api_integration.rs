//! Integration tests for the order service HTTP API.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use api::routes::orders::{AppState, SharedMenuService, SharedUserService};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use collaborators::{InMemoryMenuService, InMemoryUserService};
use common::{MenuItem, MenuItemId, Money, User, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, OrderStore};
use ordering::OrderService;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    app: axum::Router,
    users: InMemoryUserService,
    menu: InMemoryMenuService,
    store: InMemoryOrderStore,
}

/// User 1 exists; menu item 1 costs 2.50 and menu item 2 costs 5.00.
async fn setup_with_deadline(deadline: Duration) -> TestApp {
    let users = InMemoryUserService::new();
    users
        .insert(User::new(UserId::new(1), "Alice", "alice@example.com"))
        .await;
    let menu = InMemoryMenuService::new();
    menu.insert(MenuItem::new(MenuItemId::new(1), "Coffee", Money::from_cents(250)))
        .await;
    menu.insert(MenuItem::new(MenuItemId::new(2), "Sandwich", Money::from_cents(500)))
        .await;
    let store = InMemoryOrderStore::new();

    let shared_users: SharedUserService = Arc::new(users.clone());
    let shared_menu: SharedMenuService = Arc::new(menu.clone());
    let service = OrderService::with_deadline(store.clone(), shared_users, shared_menu, deadline);
    let app = api::create_app(Arc::new(AppState::new(service)), get_metrics_handle());

    TestApp {
        app,
        users,
        menu,
        store,
    }
}

async fn setup() -> TestApp {
    setup_with_deadline(Duration::from_secs(2)).await
}

fn post_orders(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn post_order_json(value: serde_json::Value) -> Request<Body> {
    post_orders(serde_json::to_string(&value).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn breakfast() -> serde_json::Value {
    serde_json::json!({
        "user_id": 1,
        "items": [
            {"menu_item_id": 1, "quantity": 2},
            {"menu_item_id": 2, "quantity": 1}
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let t = setup().await;

    let response = t.app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_order() {
    let t = setup().await;

    let response = t.app.oneshot(post_order_json(breakfast())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].as_str().is_some());
    assert_eq!(json["user_id"], 1);
    assert_eq!(json["status"], "pending");

    let items = json["order_items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["menu_item_id"], 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["price"], 2.5);
    assert_eq!(items[0]["order_id"], json["id"]);
    assert_eq!(items[1]["menu_item_id"], 2);
    assert_eq!(items[1]["price"], 5.0);
    assert!(items[0]["created_at"].as_str().is_some());
    assert!(json["created_at"].as_str().is_some());
}

#[tokio::test]
async fn test_create_and_get_order() {
    let t = setup().await;

    let created = body_json(
        t.app
            .clone()
            .oneshot(post_order_json(breakfast()))
            .await
            .unwrap(),
    )
    .await;
    let order_id = created["id"].as_str().unwrap();

    let response = t
        .app
        .oneshot(get(&format!("/orders/{order_id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_list_orders() {
    let t = setup().await;

    let response = t.app.clone().oneshot(get("/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));

    for _ in 0..2 {
        t.app
            .clone()
            .oneshot(post_order_json(breakfast()))
            .await
            .unwrap();
    }

    let json = body_json(t.app.oneshot(get("/orders")).await.unwrap()).await;
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["order_items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_price_change_does_not_alter_stored_order() {
    let t = setup().await;

    let created = body_json(
        t.app
            .clone()
            .oneshot(post_order_json(breakfast()))
            .await
            .unwrap(),
    )
    .await;
    t.menu
        .set_price(MenuItemId::new(1), Money::from_cents(400))
        .await;

    let uri = format!("/orders/{}", created["id"].as_str().unwrap());
    let fetched = body_json(t.app.oneshot(get(&uri)).await.unwrap()).await;
    assert_eq!(fetched["order_items"][0]["price"], 2.5);
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let t = setup().await;

    let response = t
        .app
        .oneshot(get("/orders/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_get_malformed_order_id() {
    let t = setup().await;

    let response = t.app.oneshot(get("/orders/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_bad_request() {
    let t = setup().await;

    let response = t
        .app
        .oneshot(post_order_json(serde_json::json!({
            "user_id": 99,
            "items": [{"menu_item_id": 1, "quantity": 1}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("User 99"));
    assert_eq!(t.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_menu_item_is_bad_request() {
    let t = setup().await;

    let response = t
        .app
        .oneshot(post_order_json(serde_json::json!({
            "user_id": 1,
            "items": [
                {"menu_item_id": 1, "quantity": 1},
                {"menu_item_id": 77, "quantity": 1}
            ]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_items_is_bad_request() {
    let t = setup().await;

    let response = t
        .app
        .oneshot(post_order_json(serde_json::json!({ "user_id": 1, "items": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.users.request_count().await, 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let t = setup().await;

    let response = t.app.oneshot(post_orders("{\"user_id\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_negative_quantity_is_bad_request() {
    let t = setup().await;

    let response = t
        .app
        .oneshot(post_order_json(serde_json::json!({
            "user_id": 1,
            "items": [{"menu_item_id": 1, "quantity": -2}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collaborator_outage_is_service_unavailable() {
    let t = setup().await;
    t.users.set_unavailable(true).await;

    let response = t.app.oneshot(post_order_json(breakfast())).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(t.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_slow_collaborator_is_service_unavailable() {
    let t = setup_with_deadline(Duration::from_millis(50)).await;
    t.menu.set_delay(Some(Duration::from_secs(5))).await;

    let response = t.app.oneshot(post_order_json(breakfast())).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unrepresentable_total_is_bad_request() {
    let t = setup().await;
    t.menu
        .insert(MenuItem::new(
            MenuItemId::new(3),
            "Golden espresso",
            Money::from_cents(10_000_000_000),
        ))
        .await;

    let response = t
        .app
        .oneshot(post_order_json(serde_json::json!({
            "user_id": 1,
            "items": [{"menu_item_id": 3, "quantity": 1_000_000_000}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_persistence_failure_is_internal_error() {
    let t = setup().await;
    t.store.set_fail_on_persist(true).await;

    let response = t.app.oneshot(post_order_json(breakfast())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let t = setup().await;

    t.app
        .clone()
        .oneshot(post_order_json(breakfast()))
        .await
        .unwrap();

    let response = t.app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("orders_created_total"));
}
