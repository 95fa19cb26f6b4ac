use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("schema.sql");

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the Postgres pool and owns the `books` schema
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool using the configured URL and limits
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        let redacted = Self::redacted_url(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool for: {}", redacted);
        Ok(pool)
    }

    /// Create the `books` table if it does not exist
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        info!("Running books migration");
        sqlx::query(SCHEMA).execute(pool).await?;
        Ok(())
    }

    /// Connection URL with the password masked, for logs
    fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
