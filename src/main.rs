use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use book_api::{
    app,
    config::config,
    database::{DatabaseManager, PgBookStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("book_api=info,tower_http=info")),
        )
        .init();

    let config = config();
    tracing::info!("Starting Book API in {:?} mode", config.environment);

    if config.is_production() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to run migrations")?;
    }

    let state = AppState::new(Arc::new(PgBookStore::new(pool.clone())), config.clone());
    let app = app(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Book API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
