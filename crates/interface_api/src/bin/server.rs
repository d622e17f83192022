//! RTW Case Core - API Server Binary
//!
//! This binary starts the HTTP API server for RTW case management.
//!
//! # Usage
//!
//! ```bash
//! # Run against the in-memory store
//! cargo run --bin rtw-api
//!
//! # Run against PostgreSQL with AI assistance enabled
//! RTW_DATABASE_URL=postgres://... RTW_AI_API_KEY=sk-... cargo run --bin rtw-api
//! ```
//!
//! # Environment Variables
//!
//! * `RTW_HOST` - Server host (default: 0.0.0.0)
//! * `RTW_PORT` - Server port (default: 8080)
//! * `RTW_JWT_SECRET` - Secret shared with the auth backend (required in production)
//! * `RTW_JWT_AUDIENCE` - Required token audience, e.g. `authenticated`; unchecked when unset
//! * `RTW_DATABASE_URL` - PostgreSQL connection string; in-memory storage when unset
//! * `RTW_DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `RTW_SETTINGS_PATH` - JSON file holding the selected AI model
//! * `RTW_AI_API_KEY` - Completion API key; AI features are disabled without it
//! * `RTW_AI_BASE_URL` - Completion API base URL
//! * `RTW_AI_MODEL` - Default model
//! * `RTW_AI_MONITOR_INTERVAL_SECS` - Seconds between connectivity checks (default: 300)
//! * `RTW_ADMIN_PROFILE_ID` - Profile id promoted to admin at startup
//! * `RTW_ADMIN_EMAIL` - Email for a newly created admin profile (default: admin@localhost)
//! * `RTW_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::ProfileId;
use domain_assist::monitor::DEFAULT_CHECK_TIMEOUT;
use domain_assist::{AssistService, ConnectionMonitor, SettingsStore};
use domain_cases::{CasePort, InMemoryCaseAdapter};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCaseAdapter};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, connects case storage, starts
/// the AI connectivity monitor and serves HTTP until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting RTW Case Core API Server"
    );

    let port = connect_storage(&config).await?;

    let settings = Arc::new(match &config.settings_path {
        Some(path) => SettingsStore::load(path, &config.ai_model),
        None => SettingsStore::in_memory(&config.ai_model),
    });
    let assist = Arc::new(AssistService::from_config(&config.assist_config(), settings));
    let monitor = ConnectionMonitor::spawn(
        assist.client(),
        assist.connection_handle(),
        config.monitor_interval(),
        DEFAULT_CHECK_TIMEOUT,
    );

    let state = AppState::new(port, assist, config.clone());
    seed_admin(&state, &config).await;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.stop().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from `RTW_` environment variables.
///
/// Falls back to defaults when the environment cannot be deserialized.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid RTW_* configuration ({e}); using defaults");
        ApiConfig {
            database_url: std::env::var("DATABASE_URL").ok(),
            ai_api_key: std::env::var("RTW_AI_API_KEY").ok(),
            ..ApiConfig::default()
        }
    })
}

/// Promotes the configured profile to admin so roles can be assigned
async fn seed_admin(state: &AppState, config: &ApiConfig) {
    let Some(raw) = &config.admin_profile_id else {
        return;
    };
    let id = match raw.parse::<ProfileId>() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(admin_profile_id = %raw, "RTW_ADMIN_PROFILE_ID is not a valid id; no admin seeded");
            return;
        }
    };
    match state.profiles.ensure_admin(id, &config.admin_email).await {
        Ok(profile) => tracing::info!(profile_id = %profile.id, "Admin profile ready"),
        Err(e) => tracing::warn!(error = %e, "Failed to seed admin profile"),
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// PostgreSQL when a database URL is configured, otherwise in-memory storage
async fn connect_storage(config: &ApiConfig) -> anyhow::Result<Arc<dyn CasePort>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db_config = DatabaseConfig::new(url.clone()).max_connections(config.database_max_connections);
            let pool = create_pool(db_config)
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool).await.context("failed to run migrations")?;
            tracing::info!("Database ready");
            Ok(Arc::new(PostgresCaseAdapter::new(pool)))
        }
        None => {
            tracing::warn!("RTW_DATABASE_URL not set; cases are kept in memory only");
            Ok(Arc::new(InMemoryCaseAdapter::new()))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
