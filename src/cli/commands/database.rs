use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{BookStore, DatabaseManager, PgBookStore};

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "migrated": true })),
        OutputFormat::Text => println!("books table is up to date"),
    }
    Ok(())
}

pub async fn ping(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database).await?;
    let store = PgBookStore::new(pool);
    store.ping().await?;
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
        .fetch_one(store.pool())
        .await?;
    store.pool().close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "database": "ok", "books": count })),
        OutputFormat::Text => println!("database ok, {} book(s)", count),
    }
    Ok(())
}
