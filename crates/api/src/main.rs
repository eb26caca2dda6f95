use std::net::SocketAddr;
use std::sync::Arc;

use gatepass_db::{MemoryVisitStore, PgVisitStore, VisitStore};
use gatepass_events::{NotificationConfig, NotificationRouter, SecurityLog, WebhookDelivery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatepass_api::config::{DeploymentMode, ServerConfig};
use gatepass_api::router::build_app_router;
use gatepass_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = config.port,
        mode = ?config.mode,
        policy = ?config.status_policy,
        "Loaded server configuration"
    );

    let notification_config = NotificationConfig::from_env(config.mode.forwards_app());
    tracing::info!(
        host_channel = notification_config.host.name(),
        security_channel = notification_config.security.name(),
        timeout_secs = notification_config.timeout.as_secs(),
        "Loaded notification configuration"
    );

    // --- Visit store ---
    let store = build_store(&config).await;

    // --- Notifications ---
    let security_log = Arc::new(SecurityLog::new());
    let delivery = WebhookDelivery::new(notification_config.timeout)
        .expect("Failed to build webhook HTTP client");
    let notifier = Arc::new(NotificationRouter::new(
        notification_config,
        delivery,
        Arc::clone(&security_log),
    ));

    // --- App state ---
    let state = AppState {
        store,
        notifier,
        security_log,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "gatepass_api=debug,gatepass_events=debug,tower_http=debug".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Select the visit store for this deployment.
///
/// Postgres when `DATABASE_URL` is set (migrations are applied on start),
/// otherwise an in-memory store whose contents are lost on restart. The
/// security-only deployment never touches the database.
async fn build_store(config: &ServerConfig) -> Arc<dyn VisitStore> {
    let database_url = match (&config.database_url, config.mode) {
        (_, DeploymentMode::Security) => None,
        (url, _) => url.as_deref(),
    };

    let Some(database_url) = database_url else {
        if config.mode.serves_visitors() {
            tracing::warn!("DATABASE_URL not set, using in-memory visit store");
        }
        return Arc::new(MemoryVisitStore::new(config.status_policy));
    };

    let pool = gatepass_db::create_pool(database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    gatepass_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    gatepass_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgVisitStore::new(pool, config.status_policy))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
