use anyhow::Context;
use std::net::SocketAddr;

use studio_api::config::config;
use studio_api::database::{schema, DatabaseManager};
use studio_api::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config();
    logging::init(config);
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Starting Studio API in {:?} mode", config.environment);

    if config.database.run_migrations {
        match DatabaseManager::pool() {
            Ok(pool) => {
                if let Err(e) = schema::run_migrations(pool).await {
                    tracing::warn!("Skipping startup migrations, database not ready: {}", e);
                }
            }
            Err(e) => tracing::warn!("Database not configured: {}", e),
        }
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Studio API listening on http://{}", bind_addr);

    axum::serve(
        listener,
        studio_api::app().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    DatabaseManager::close().await;
    tracing::info!("Studio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
