//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - Database connection with the non-production local fallback
//! - Migration running
//! - Application state creation
//! - Router creation
//! - Server binding and graceful shutdown

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::state;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Run the web server with the given configuration.
///
/// Connects to the database (falling back to the local default connection
/// outside production), optionally runs migrations, builds the router, and
/// serves until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error when no database is reachable, migration fails, or the
/// listener cannot bind. Startup errors propagate out of `main` and
/// terminate the process.
pub async fn run_server(config: Config, addr: String, should_migrate: bool) -> AppResult<()> {
    info!("Starting smartlink server...");

    info!("Connecting to database...");
    let repository = connect_with_fallback(&config).await?;
    info!("Database connection established");

    if should_migrate {
        info!("Running database migrations...");
        repository.run_migrations().await?;
        info!("Migrations completed successfully");
    }

    let state = Arc::new(state::AppState {
        repository,
        base_url: config.url.base_url.clone(),
        short_id_length: config.url.short_id_length,
        short_id_max_attempts: config.url.short_id_max_attempts,
        recent_limit: config.url.recent_limit,
        default_page_size: config.url.default_page_size,
        max_page_size: config.url.max_page_size,
        started_at: Instant::now(),
    });

    let app = routes::create_router(state, config.cors.allowed_origins);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("Base URL: {}", config.url.base_url);
    info!("Health check available at /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Connect to the primary database, trying the local fallback connection
/// when the primary fails outside production.
async fn connect_with_fallback(config: &Config) -> AppResult<Repository> {
    let primary = Repository::new(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.acquire_timeout_seconds,
    )
    .await;

    match primary {
        Ok(repository) => Ok(repository),
        Err(e) if !config.environment.is_production() => {
            warn!(
                "Primary database connection failed: {}. Attempting local fallback...",
                e
            );
            Repository::new(
                &config.database.fallback_url,
                config.database.max_connections,
                config.database.min_connections,
                config.database.acquire_timeout_seconds,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails. This is intentional because
/// signal handler failures are unrecoverable system-level errors that indicate
/// the OS cannot deliver shutdown signals, making graceful shutdown impossible.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
