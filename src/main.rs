//! Car API Server - Main Application Entry Point
//!
//! REST API for registering users, logging in and managing a car inventory.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: MySQL with sqlx (async queries)
//! - **Passwords**: bcrypt hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port, stop on Ctrl-C or SIGTERM

use tracing_subscriber::EnvFilter;

use car_api_server::{
    app::{self, AppState},
    config::Config,
    db::ConnectionPool,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let session = config.session_settings()?;
    tracing::info!(
        db_host = %config.db_host,
        db_name = %config.db_name,
        pool_size = config.db_pool_size,
        "Configuration loaded"
    );

    // Create database pool
    let pool = ConnectionPool::connect(
        config.connect_options(),
        config.db_pool_size,
        config.acquire_timeout(),
    )
    .await?;
    tracing::info!("Database pool created");

    let app = app::router(AppState::new(pool.clone(), session));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server started at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    let stats = pool.stats();
    tracing::info!(
        acquired = stats.acquired,
        released = stats.released,
        "Server stopped"
    );

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
