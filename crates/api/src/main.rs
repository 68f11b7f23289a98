//! Order service entry point.

use api::config::Config;
use discovery::{ConsulRegistrar, ServiceRegistration};
use order_store::PostgresOrderStore;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Registers with the registry if enabled. Failure is logged and ignored.
async fn register(config: &Config) -> Option<(ConsulRegistrar, ServiceRegistration)> {
    if !config.register_with_registry {
        return None;
    }

    let registrar = ConsulRegistrar::new(&config.consul_addr).with_timeout(config.registry_timeout);
    let registration =
        ServiceRegistration::new(&config.service_name, &config.service_address, config.port);

    match registrar.register(&registration).await {
        Ok(()) => {
            tracing::info!(service_id = %registration.id, "registered with service registry");
            Some((registrar, registration))
        }
        Err(err) => {
            tracing::warn!(error = %err, "service registration failed, continuing without it");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = Config::from_env();

    // 2. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Connect to the order database and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to the order database");
    let store = PostgresOrderStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("failed to run database migrations");

    // 5. Wire discovery, collaborators and the order service
    let http = reqwest::Client::builder()
        .timeout(config.remote_call_timeout)
        .build()
        .expect("failed to build HTTP client");
    let locator = api::build_locator(&config, http.clone());
    tracing::info!(strategy = ?config.discovery, "service discovery configured");
    let state = api::create_state(store, &config, http, locator);

    // 6. Build the application
    let app = api::create_app(state, metrics_handle);

    // 7. Start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, "starting order service");

    let registration = register(&config).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // 8. Leave the registry
    if let Some((registrar, registration)) = registration {
        if let Err(err) = registrar.deregister(&registration.id).await {
            tracing::warn!(error = %err, "service deregistration failed");
        }
    }

    tracing::info!("server shut down gracefully");
}
