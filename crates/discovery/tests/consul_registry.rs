//! Locator and registrar behaviour against a fake Consul agent.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use discovery::{
    ConsulLocator, ConsulRegistrar, DiscoveryError, FallbackLocator, Resolution,
    ServiceLocator, ServiceRegistration, StaticLocator,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing is listening on.
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn fake_registry(instances: Value) -> Router {
    Router::new().route(
        "/v1/health/service/{name}",
        get(move |Path(name): Path<String>, RawQuery(query): RawQuery| {
            let instances = instances.clone();
            async move {
                assert_eq!(query.as_deref(), Some("passing=true"));
                match name.as_str() {
                    "user-service" => axum::Json(instances),
                    _ => axum::Json(json!([])),
                }
            }
        }),
    )
}

#[tokio::test]
async fn resolves_first_healthy_instance() {
    let registry = spawn(fake_registry(json!([
        {"Node": {"Address": "10.0.0.1"}, "Service": {"Address": "10.0.1.1", "Port": 8081}},
        {"Node": {"Address": "10.0.0.2"}, "Service": {"Address": "10.0.1.2", "Port": 8081}}
    ])))
    .await;

    let locator = ConsulLocator::new(registry);
    let endpoint = locator.resolve("user-service").await.unwrap();

    assert_eq!(endpoint.base_url(), "http://10.0.1.1:8081");
    assert_eq!(endpoint.resolution(), Resolution::Registry);
}

#[tokio::test]
async fn uses_node_address_when_service_address_is_empty() {
    let registry = spawn(fake_registry(json!([
        {"Node": {"Address": "10.0.0.9"}, "Service": {"Address": "", "Port": 9000}}
    ])))
    .await;

    let endpoint = ConsulLocator::new(registry)
        .resolve("user-service")
        .await
        .unwrap();
    assert_eq!(endpoint.base_url(), "http://10.0.0.9:9000");
}

#[tokio::test]
async fn service_name_stays_inside_its_path_segment() {
    let registry = spawn(fake_registry(json!([
        {"Node": {"Address": "10.0.0.1"}, "Service": {"Address": "10.0.1.1", "Port": 8081}}
    ])))
    .await;
    let locator = ConsulLocator::new(registry);

    for name in ["user-service?passing=false", "user-service/../user-service"] {
        let err = locator.resolve(name).await.unwrap_err();
        assert!(
            matches!(err, DiscoveryError::NoHealthyInstances(ref n) if n == name),
            "{name}: {err}"
        );
    }
}

#[tokio::test]
async fn no_healthy_instances_is_an_error() {
    let registry = spawn(fake_registry(json!([]))).await;

    let err = ConsulLocator::new(registry)
        .resolve("menu-service")
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::NoHealthyInstances(ref s) if s == "menu-service"));
}

#[tokio::test]
async fn registry_error_status_is_reported() {
    let registry = spawn(Router::new().route(
        "/v1/health/service/{name}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let err = ConsulLocator::new(registry)
        .resolve("user-service")
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::RegistryStatus { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_registry_is_reported() {
    let locator = ConsulLocator::new(dead_address().await).with_timeout(Duration::from_millis(500));

    let err = locator.resolve("user-service").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::RegistryUnreachable { .. }));
}

#[tokio::test]
async fn hybrid_falls_back_when_registry_is_unreachable() {
    let registry = ConsulLocator::new(dead_address().await).with_timeout(Duration::from_millis(500));
    let conventional = StaticLocator::new().with_service("user-service", "http://user-service:8081");
    let locator = FallbackLocator::new(registry, conventional);

    let endpoint = locator.resolve("user-service").await.unwrap();
    assert_eq!(endpoint.base_url(), "http://user-service:8081");
    assert_eq!(endpoint.resolution(), Resolution::Fallback);
}

#[tokio::test]
async fn hybrid_falls_back_when_registry_has_no_instances() {
    let registry = spawn(fake_registry(json!([]))).await;
    let conventional = StaticLocator::new().with_service("menu-service", "http://menu-service:8082");
    let locator = FallbackLocator::new(ConsulLocator::new(registry), conventional);

    let endpoint = locator.resolve("menu-service").await.unwrap();
    assert_eq!(endpoint.resolution(), Resolution::Fallback);
}

#[tokio::test]
async fn registrar_registers_and_deregisters() {
    let seen: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();

    let router = Router::new()
        .route(
            "/v1/agent/service/register",
            put(
                |State(seen): State<Arc<Mutex<Vec<(String, Value)>>>>,
                 axum::Json(body): axum::Json<Value>| async move {
                    seen.lock().unwrap().push(("register".to_string(), body));
                    StatusCode::OK
                },
            ),
        )
        .route(
            "/v1/agent/service/deregister/{id}",
            put(
                |State(seen): State<Arc<Mutex<Vec<(String, Value)>>>>, Path(id): Path<String>| async move {
                    seen.lock().unwrap().push(("deregister".to_string(), json!(id)));
                    StatusCode::OK
                },
            ),
        )
        .with_state(seen.clone());
    let registry = spawn(router).await;

    let registrar = ConsulRegistrar::new(registry);
    let registration = ServiceRegistration::new("order-service", "order-host", 8083);
    registrar.register(&registration).await.unwrap();
    registrar.deregister(&registration.id).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "register");
    assert_eq!(seen[0].1["Name"], "order-service");
    assert_eq!(seen[0].1["Check"]["HTTP"], "http://order-host:8083/health");
    assert_eq!(seen[1], ("deregister".to_string(), json!("order-service-order-host")));
}

#[tokio::test]
async fn registrar_reports_rejected_registration() {
    let registry = spawn(Router::new().route(
        "/v1/agent/service/register",
        put(|| async { StatusCode::FORBIDDEN }),
    ))
    .await;

    let err = ConsulRegistrar::new(registry)
        .register(&ServiceRegistration::new("order-service", "h", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Registration { .. }));
}
