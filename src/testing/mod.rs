//! In-memory BookStore and request helpers for router-level tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;
use crate::database::models::{BookChanges, BookRow, NewBook, Star};
use crate::database::store::{BookStore, StoreError};

pub const TEST_SECRET: &str = "test-secret";

/// Vec-backed store. Substring matching is plain `contains`, which agrees with
/// `LIKE '%v%'` for inputs without `%` or `_`.
#[derive(Default)]
pub struct MemoryBookStore {
    table: Mutex<Table>,
    failing: AtomicBool,
}

#[derive(Default)]
struct Table {
    rows: Vec<BookRow>,
    next_id: i32,
}

impl MemoryBookStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call fail like a dropped connection
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<BookRow> {
        self.table.lock().unwrap().rows.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn select(&self, keep: impl Fn(&BookRow) -> bool) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        Ok(self.table.lock().unwrap().rows.iter().filter(|r| keep(*r)).cloned().collect())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn max_id(&self) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.table.lock().unwrap().rows.iter().map(|r| r.id as i64).max().unwrap_or(0))
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        let mut rows = self.table.lock().unwrap().rows.clone();
        rows.sort_by_key(|r| r.id);
        Ok(rows.into_iter().skip(offset as usize).take(limit as usize).collect())
    }

    async fn by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.authors.contains(author))
    }

    async fn by_title(&self, title: &str) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.title.contains(title))
    }

    async fn by_year(&self, year: i32) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.publication_year == year)
    }

    async fn by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.isbn13 == isbn13)
    }

    async fn by_rating(&self, rating: f64) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.rating_avg == rating)
    }

    async fn by_rating_range(&self, min: f64, max: f64) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.rating_avg >= min && r.rating_avg <= max)
    }

    async fn by_author_title(&self, author: &str, title: &str) -> Result<Vec<BookRow>, StoreError> {
        self.select(|r| r.authors.contains(author) && r.title.contains(title))
    }

    async fn author_exists(&self, author: &str) -> Result<bool, StoreError> {
        Ok(!self.by_author(author).await?.is_empty())
    }

    async fn title_exists(&self, title: &str) -> Result<bool, StoreError> {
        Ok(!self.by_title(title).await?.is_empty())
    }

    async fn insert(&self, book: NewBook) -> Result<BookRow, StoreError> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        if table.rows.iter().any(|r| r.isbn13 == book.isbn13) {
            return Err(StoreError::Duplicate(book.isbn13));
        }
        table.next_id += 1;
        let row = BookRow {
            id: table.next_id,
            isbn13: book.isbn13,
            authors: book.authors,
            publication_year: book.publication_year,
            original_title: book.original_title,
            title: book.title,
            rating_avg: book.rating_avg,
            rating_count: book.rating_count,
            rating_1_star: book.rating_1_star,
            rating_2_star: book.rating_2_star,
            rating_3_star: book.rating_3_star,
            rating_4_star: book.rating_4_star,
            rating_5_star: book.rating_5_star,
            image_url: book.image_url,
            image_small_url: book.image_small_url,
        };
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn delete_by_author(&self, author: &str) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        let rows = &mut table.rows;
        let (deleted, kept): (Vec<BookRow>, Vec<BookRow>) = rows.drain(..).partition(|r| r.authors.contains(author));
        *rows = kept;
        Ok(deleted)
    }

    async fn delete_by_isbn(&self, isbn13: i64) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        let rows = &mut table.rows;
        let (deleted, kept): (Vec<BookRow>, Vec<BookRow>) = rows.drain(..).partition(|r| r.isbn13 == isbn13);
        *rows = kept;
        Ok(deleted)
    }

    async fn change_values(
        &self,
        author: &str,
        title: &str,
        changes: BookChanges,
    ) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        let rows = &mut table.rows;
        if let Some(isbn) = changes.isbn13 {
            let hits = rows.iter().filter(|r| matches_pair(r, author, title)).count();
            let clash = rows.iter().any(|r| r.isbn13 == isbn && !matches_pair(r, author, title));
            if clash || hits > 1 {
                return Err(StoreError::Duplicate(isbn));
            }
        }

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| matches_pair(r, author, title)) {
            if let Some(t) = &changes.title {
                row.title = t.clone();
            }
            if let Some(a) = &changes.authors {
                row.authors = a.clone();
            }
            if let Some(i) = changes.isbn13 {
                row.isbn13 = i;
            }
            if let Some(y) = changes.publication_year {
                row.publication_year = y;
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn add_rating(&self, author: &str, title: &str, star: Star) -> Result<Vec<BookRow>, StoreError> {
        self.check()?;
        let mut table = self.table.lock().unwrap();
        let rows = &mut table.rows;
        let mut updated = Vec::new();
        for row in rows
            .iter_mut()
            .filter(|r| matches_pair(r, author, title))
        {
            match star {
                Star::One => row.rating_1_star += 1,
                Star::Two => row.rating_2_star += 1,
                Star::Three => row.rating_3_star += 1,
                Star::Four => row.rating_4_star += 1,
                Star::Five => row.rating_5_star += 1,
            }
            row.rating_count += 1;
            updated.push(row.clone());
        }
        Ok(updated)
    }
}

fn matches_pair(row: &BookRow, author: &str, title: &str) -> bool {
    row.authors.contains(author) && row.title.contains(title)
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

pub fn test_app(store: Arc<MemoryBookStore>) -> Router {
    app(AppState::new(store, test_config()))
}

pub fn token_with_role(role: &str) -> String {
    generate_jwt(&Claims::new("tester", role, 1), TEST_SECRET).unwrap()
}

pub fn admin_token() -> String {
    token_with_role("admin")
}

/// Seed a book with the given average rating
pub async fn seed(store: &MemoryBookStore, isbn13: i64, authors: &str, title: &str, year: i32, avg: f64) -> BookRow {
    let mut book = NewBook::new(isbn13, authors, year, title);
    book.rating_avg = avg;
    store.insert(book).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn admin_request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Run one request through the router and decode the JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
