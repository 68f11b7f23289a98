//! HTTP order service with service discovery and observability.
//!
//! Provides REST endpoints for creating and reading orders, resolves its
//! user and menu collaborators through a service locator, and exposes
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use collaborators::{HttpMenuService, HttpUserService};
use discovery::{ConsulLocator, FallbackLocator, ServiceLocator, StaticLocator};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use ordering::OrderService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{Config, DiscoveryStrategy};
use routes::orders::{AppState, SharedMenuService, SharedUserService};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/orders",
            get(routes::orders::list::<S>).post(routes::orders::create::<S>),
        )
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds the collaborator locator for the configured strategy.
///
/// The static table always comes from configuration: it is the whole answer
/// for `static` and the fallback for `hybrid`.
pub fn build_locator(config: &Config, http: reqwest::Client) -> Arc<dyn ServiceLocator> {
    let static_locator = StaticLocator::new()
        .with_service(&config.user_service_name, &config.user_service_url)
        .with_service(&config.menu_service_name, &config.menu_service_url);
    let registry = || {
        ConsulLocator::new(&config.consul_addr)
            .with_timeout(config.registry_timeout)
            .with_client(http.clone())
    };

    match config.discovery {
        DiscoveryStrategy::Static => Arc::new(static_locator),
        DiscoveryStrategy::Registry => Arc::new(registry()),
        DiscoveryStrategy::Hybrid => Arc::new(FallbackLocator::new(registry(), static_locator)),
    }
}

/// Creates the application state backed by HTTP collaborators.
pub fn create_state<S: OrderStore + 'static>(
    store: S,
    config: &Config,
    http: reqwest::Client,
    locator: Arc<dyn ServiceLocator>,
) -> Arc<AppState<S>> {
    let users: SharedUserService = Arc::new(HttpUserService::new(
        http.clone(),
        locator.clone(),
        &config.user_service_name,
    ));
    let menu: SharedMenuService = Arc::new(HttpMenuService::new(
        http,
        locator,
        &config.menu_service_name,
    ));

    let order_service =
        OrderService::with_deadline(store, users, menu, config.remote_call_timeout);
    Arc::new(AppState::new(order_service))
}
