use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{BookChanges, BookRow, NewBook, Star};

/// Errors from a BookStore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Book with ISBN {0} already exists")]
    Duplicate(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage operations behind the book endpoints.
///
/// String lookups are substring matches (`LIKE '%value%'`). Every method is a
/// single statement; callers that chain several calls get no transaction.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Highest `id` in the table, 0 when empty
    async fn max_id(&self) -> Result<i64, StoreError>;

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<BookRow>, StoreError>;

    async fn by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError>;

    async fn by_title(&self, title: &str) -> Result<Vec<BookRow>, StoreError>;

    async fn by_year(&self, year: i32) -> Result<Vec<BookRow>, StoreError>;

    async fn by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError>;

    async fn by_rating(&self, rating: f64) -> Result<Vec<BookRow>, StoreError>;

    async fn by_rating_range(&self, min: f64, max: f64) -> Result<Vec<BookRow>, StoreError>;

    async fn by_author_title(&self, author: &str, title: &str) -> Result<Vec<BookRow>, StoreError>;

    async fn author_exists(&self, author: &str) -> Result<bool, StoreError>;

    async fn title_exists(&self, title: &str) -> Result<bool, StoreError>;

    async fn insert(&self, book: NewBook) -> Result<BookRow, StoreError>;

    async fn delete_by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError>;

    async fn delete_by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError>;

    async fn change_values(
        &self,
        author: &str,
        title: &str,
        changes: BookChanges,
    ) -> Result<Vec<BookRow>, StoreError>;

    /// Bumps one star bucket and `rating_count` by one. `rating_avg` is left untouched.
    async fn add_rating(&self, author: &str, title: &str, star: Star) -> Result<Vec<BookRow>, StoreError>;
}

/// Wraps a value in `%...%` for a LIKE substring match
pub fn like_pattern(value: &str) -> String {
    format!("%{}%", value)
}
