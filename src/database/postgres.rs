use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{BookChanges, BookRow, NewBook, Star};
use crate::database::store::{like_pattern, BookStore, StoreError};

/// BookStore over the `books` table in Postgres
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_like(&self, sql: &str, value: &str) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(sql)
            .bind(like_pattern(value))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Maps a unique-key violation to `StoreError::Duplicate` for the given ISBN
fn classify(err: sqlx::Error, isbn13: i64) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate(isbn13),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn max_id(&self) -> Result<i64, StoreError> {
        let max = sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(id), 0)::BIGINT FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError> {
        self.fetch_like("SELECT * FROM books WHERE authors LIKE $1 ORDER BY id", author)
            .await
    }

    async fn by_title(&self, title: &str) -> Result<Vec<BookRow>, StoreError> {
        self.fetch_like("SELECT * FROM books WHERE title LIKE $1 ORDER BY id", title)
            .await
    }

    async fn by_year(&self, year: i32) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE publication_year = $1 ORDER BY id")
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE isbn13 = $1")
            .bind(isbn13)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn by_rating(&self, rating: f64) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE rating_avg = $1 ORDER BY id")
            .bind(rating)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn by_rating_range(&self, min: f64, max: f64) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT * FROM books WHERE rating_avg >= $1 AND rating_avg <= $2 ORDER BY id",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_author_title(&self, author: &str, title: &str) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT * FROM books WHERE authors LIKE $1 AND title LIKE $2 ORDER BY id",
        )
        .bind(like_pattern(author))
        .bind(like_pattern(title))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn author_exists(&self, author: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM books WHERE authors LIKE $1)")
            .bind(like_pattern(author))
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn title_exists(&self, title: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM books WHERE title LIKE $1)")
            .bind(like_pattern(title))
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, book: NewBook) -> Result<BookRow, StoreError> {
        let query = r#"
            INSERT INTO books (
                isbn13, authors, publication_year, original_title, title,
                rating_avg, rating_count,
                rating_1_star, rating_2_star, rating_3_star, rating_4_star, rating_5_star,
                image_url, image_small_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
        "#;

        sqlx::query_as::<_, BookRow>(query)
            .bind(book.isbn13)
            .bind(&book.authors)
            .bind(book.publication_year)
            .bind(&book.original_title)
            .bind(&book.title)
            .bind(book.rating_avg)
            .bind(book.rating_count)
            .bind(book.rating_1_star)
            .bind(book.rating_2_star)
            .bind(book.rating_3_star)
            .bind(book.rating_4_star)
            .bind(book.rating_5_star)
            .bind(&book.image_url)
            .bind(&book.image_small_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, book.isbn13))
    }

    async fn delete_by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError> {
        self.fetch_like("DELETE FROM books WHERE authors LIKE $1 RETURNING *", author)
            .await
    }

    async fn delete_by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>("DELETE FROM books WHERE isbn13 = $1 RETURNING *")
            .bind(isbn13)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn change_values(
        &self,
        author: &str,
        title: &str,
        changes: BookChanges,
    ) -> Result<Vec<BookRow>, StoreError> {
        let query = r#"
            UPDATE books SET
                title = COALESCE($3, title),
                authors = COALESCE($4, authors),
                isbn13 = COALESCE($5, isbn13),
                publication_year = COALESCE($6, publication_year)
            WHERE authors LIKE $1 AND title LIKE $2
            RETURNING *
        "#;

        let new_isbn = changes.isbn13.unwrap_or_default();
        sqlx::query_as::<_, BookRow>(query)
            .bind(like_pattern(author))
            .bind(like_pattern(title))
            .bind(changes.title)
            .bind(changes.authors)
            .bind(changes.isbn13)
            .bind(changes.publication_year)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, new_isbn))
    }

    async fn add_rating(&self, author: &str, title: &str, star: Star) -> Result<Vec<BookRow>, StoreError> {
        let column = star.column();
        let query = format!(
            "UPDATE books SET {column} = {column} + 1, rating_count = rating_count + 1 \
             WHERE authors LIKE $1 AND title LIKE $2 RETURNING *"
        );

        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(like_pattern(author))
            .bind(like_pattern(title))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
