// Mutation endpoints under /adminBook, behind require_admin
use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use serde_json::Value;

use crate::api::format::{books_from_rows, Book};
use crate::app::AppState;
use crate::database::models::{BookChanges, NewBook, Star};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::validate;

/// Body of POST /adminBook/addBook. Numeric fields may be numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct AddBookRequest {
    pub isbn13: Option<Value>,
    pub authors: Option<String>,
    #[serde(alias = "publication_year")]
    pub publication: Option<Value>,
    pub original_title: Option<String>,
    pub title: Option<String>,
    pub rating_avg: Option<Value>,
    pub rating_count: Option<Value>,
    pub rating_1_star: Option<Value>,
    pub rating_2_star: Option<Value>,
    pub rating_3_star: Option<Value>,
    pub rating_4_star: Option<Value>,
    pub rating_5_star: Option<Value>,
    pub image_url: Option<String>,
    pub image_small_url: Option<String>,
}

impl AddBookRequest {
    /// Check required fields and ranges, filling defaults for omitted optionals
    pub fn validate(self) -> Result<NewBook, ApiError> {
        let (Some(isbn13), Some(authors), Some(publication), Some(title)) =
            (self.isbn13.as_ref(), self.authors.as_deref(), self.publication.as_ref(), self.title.as_deref())
        else {
            return Err(ApiError::bad_request(
                "Missing required information: isbn13, authors, publication and title are required",
            ));
        };

        let isbn13 = validate::json_isbn13(isbn13)?;
        let authors = validate::required_text("authors", Some(authors))?;
        let publication_year = validate::json_year("publication", publication)?;
        let title = validate::required_text("title", Some(title))?;

        let mut book = NewBook::new(isbn13, authors, publication_year, title);
        book.original_title = self.original_title.unwrap_or_default();
        book.rating_avg = validate::json_average("rating_avg", self.rating_avg.as_ref())?;
        book.rating_count = validate::json_count("rating_count", self.rating_count.as_ref())?;
        book.rating_1_star = validate::json_count("rating_1_star", self.rating_1_star.as_ref())?;
        book.rating_2_star = validate::json_count("rating_2_star", self.rating_2_star.as_ref())?;
        book.rating_3_star = validate::json_count("rating_3_star", self.rating_3_star.as_ref())?;
        book.rating_4_star = validate::json_count("rating_4_star", self.rating_4_star.as_ref())?;
        book.rating_5_star = validate::json_count("rating_5_star", self.rating_5_star.as_ref())?;
        book.image_url = self.image_url.unwrap_or_default();
        book.image_small_url = self.image_small_url.unwrap_or_default();

        Ok(book)
    }
}

/// POST /adminBook/addBook
pub async fn add_book(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AddBookRequest>,
) -> ApiResult<Book> {
    let book = payload.validate()?;

    let row = state.store.insert(book).await?;
    tracing::info!("{} added book {}", user.sub, row.isbn13);
    Ok(ApiResponse::created(Book::from(row)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteAuthorRequest {
    pub author: Option<String>,
}

/// DELETE /adminBook/author
pub async fn delete_by_author(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<DeleteAuthorRequest>,
) -> ApiResult<Vec<Book>> {
    let author = validate::required_text("author", payload.author.as_deref())?;

    let rows = state.store.delete_by_author(author).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("Author not found"));
    }
    tracing::info!("{} deleted {} book(s) by author '{}'", user.sub, rows.len(), author);
    Ok(ApiResponse::success(books_from_rows(rows)))
}

/// DELETE /adminBook/isbn/:isbn
pub async fn delete_by_isbn(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(isbn): Path<String>,
) -> ApiResult<Vec<Book>> {
    let isbn = validate::nonnegative_isbn(&isbn)?;

    let rows = state.store.delete_by_isbn(isbn).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("Book not found"));
    }
    tracing::info!("{} deleted book {}", user.sub, isbn);
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValuesRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub new_title: Option<String>,
    pub new_author: Option<String>,
    pub new_isbn: Option<Value>,
    pub new_year: Option<Value>,
}

impl ChangeValuesRequest {
    pub fn changes(&self) -> Result<BookChanges, ApiError> {
        let changes = BookChanges {
            title: validate::optional_text(self.new_title.clone()),
            authors: validate::optional_text(self.new_author.clone()),
            isbn13: present(&self.new_isbn).map(validate::json_isbn13).transpose()?,
            publication_year: present(&self.new_year)
                .map(|v| validate::json_year("new_year", v))
                .transpose()?,
        };
        if changes.is_empty() {
            return Err(ApiError::bad_request(
                "No new values provided: supply new_title, new_author, new_isbn or new_year",
            ));
        }
        Ok(changes)
    }
}

/// JSON null and blank strings count as "not provided"
fn present(value: &Option<Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

/// PUT /adminBook/changeValues
pub async fn change_values(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ChangeValuesRequest>,
) -> ApiResult<Vec<Book>> {
    let author = validate::required_text("author", payload.author.as_deref())?;
    let title = validate::required_text("title", payload.title.as_deref())?;
    let changes = payload.changes()?;

    let rows = state.store.change_values(author, title, changes).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No book found with that author and title"));
    }
    tracing::info!("{} changed {} book(s) matching '{}' / '{}'", user.sub, rows.len(), author, title);
    Ok(ApiResponse::created(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct AddRatingRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub rating: Option<Value>,
}

/// PUT /adminBook/addRating
///
/// Counts one more vote in a star bucket. The stored average is not recomputed.
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AddRatingRequest>,
) -> ApiResult<Vec<Book>> {
    let author = validate::required_text("author", payload.author.as_deref())?;
    let title = validate::required_text("title", payload.title.as_deref())?;
    let rating = payload
        .rating
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: rating"))?;
    let star = validate::json_integer(rating)
        .ok_or_else(|| ApiError::bad_request("Rating must be an integer"))?;
    let star = Star::from_rating(star)
        .ok_or_else(|| ApiError::bad_request("Rating must be between 1 and 5"))?;

    if !state.store.title_exists(title).await? {
        return Err(ApiError::not_found("Title not found"));
    }
    if !state.store.author_exists(author).await? {
        return Err(ApiError::not_found("Author not found"));
    }

    let rows = state.store.add_rating(author, title, star).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No book found with that author and title"));
    }
    tracing::info!("{} added a {} rating to '{}'", user.sub, star.column(), title);
    Ok(ApiResponse::created(books_from_rows(rows)))
}
