//! Bug Tracker Server
//!
//! HTTP server binary: loads configuration, establishes the database
//! pool and serves the API until shutdown.

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bt_api::AppState;
use bt_auth::JwtService;
use bt_core::AppConfig;
use bt_db::{Database, PoolConfig};
use bt_services::mailer::{SmtpMailer, VerificationMailer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    init_tracing();

    // Load configuration; the SQL_* variables are mandatory
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Failed to load config from env: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Bug Tracker API"
    );

    if config.auth.uses_insecure_secret() {
        tracing::warn!("JWT_SECRET is not set; tokens are signed with the insecure default");
    }

    // Connect to database, retrying while it comes up. Exhausted retries
    // abort startup.
    let pool_config = PoolConfig::from(&config.database);
    let db = Database::connect_with_retry(&pool_config).await?;

    // Assemble shared state
    let jwt = Arc::new(JwtService::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_expiration_seconds,
    ));
    let mailer = Arc::new(SmtpMailer::new(config.email.clone()));
    if !mailer.is_configured() {
        tracing::warn!(
            "EMAIL_HOST/EMAIL_USER/EMAIL_PASS not fully set; verification emails will fail to send"
        );
    }
    let state = AppState::new(db.pool().clone(), jwt, mailer);

    let app = bt_api::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    );

    // Start server
    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bt_server=debug,bt_api=debug,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
