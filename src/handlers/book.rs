// Public read endpoints under /book
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::api::format::{books_from_rows, Book};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub pagenum: Option<String>,
    pub perpage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub pagenum: i64,
    pub perpage: i64,
    pub max_page: i64,
}

#[derive(Debug, Serialize)]
pub struct BookPage {
    pub pagination: Pagination,
    pub entries: Vec<Book>,
}

/// GET /book/getAll?pagenum&perpage
pub async fn get_all(State(state): State<AppState>, Query(query): Query<PageQuery>) -> ApiResult<BookPage> {
    if query.pagenum.is_none() || query.perpage.is_none() {
        return Err(ApiError::bad_request("Missing required parameters: pagenum and perpage"));
    }
    let pagenum = validate::positive_int("pagenum", query.pagenum.as_deref())?;
    let perpage = validate::positive_int("perpage", query.perpage.as_deref())?;

    let max_id = state.store.max_id().await?;
    let max_page = max_id / perpage + i64::from(max_id % perpage != 0);
    if pagenum > max_page {
        return Err(ApiError::bad_request("Page outside of range."));
    }

    let offset = (pagenum - 1) * perpage;
    let rows = state.store.page(perpage, offset).await?;

    Ok(ApiResponse::success(BookPage {
        pagination: Pagination { pagenum, perpage, max_page },
        entries: books_from_rows(rows),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author: Option<String>,
}

/// GET /book/author?author
pub async fn by_author(State(state): State<AppState>, Query(query): Query<AuthorQuery>) -> ApiResult<Vec<Book>> {
    let author = validate::required_text("author", query.author.as_deref())?;

    let rows = state.store.by_author(author).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("Author not found"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

/// GET /book/title?title
pub async fn by_title(State(state): State<AppState>, Query(query): Query<TitleQuery>) -> ApiResult<Vec<Book>> {
    let title = validate::required_text("title", query.title.as_deref())?;

    let rows = state.store.by_title(title).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No books found with that title"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

/// GET /book/year?year
pub async fn by_year(State(state): State<AppState>, Query(query): Query<YearQuery>) -> ApiResult<Vec<Book>> {
    let raw = validate::required_text("year", query.year.as_deref())?;
    let year = validate::year(raw)?;

    let rows = state.store.by_year(year).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found(format!("No books published in {}", year)));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct IsbnQuery {
    pub isbn: Option<String>,
}

/// GET /book/isbn?isbn
pub async fn by_isbn(State(state): State<AppState>, Query(query): Query<IsbnQuery>) -> ApiResult<Vec<Book>> {
    let raw = validate::required_text("isbn", query.isbn.as_deref())?;
    let isbn = validate::isbn13(raw)?;

    let rows = state.store.by_isbn(isbn).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("Book not found"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct SingleRatingQuery {
    pub rating: Option<String>,
}

/// GET /book/singlerating?rating
pub async fn by_single_rating(
    State(state): State<AppState>,
    Query(query): Query<SingleRatingQuery>,
) -> ApiResult<Vec<Book>> {
    let raw = validate::required_text("rating", query.rating.as_deref())?;
    let rating = validate::single_rating(raw)?;

    let rows = state.store.by_rating(rating).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No books with that rating"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct RatingRangeQuery {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// GET /book/ratings?min&max
pub async fn by_rating_range(
    State(state): State<AppState>,
    Query(query): Query<RatingRangeQuery>,
) -> ApiResult<Vec<Book>> {
    let min = validate::required_text("min", query.min.as_deref())?;
    let max = validate::required_text("max", query.max.as_deref())?;
    let (min, max) = validate::rating_range(min, max)?;

    let rows = state.store.by_rating_range(min, max).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No books with ratings in that range"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}

#[derive(Debug, Deserialize)]
pub struct AuthorTitleQuery {
    pub author: Option<String>,
    pub title: Option<String>,
}

/// GET /book/authortitle?author&title
///
/// Staged: the author must exist, then the title, then the pair.
pub async fn by_author_title(
    State(state): State<AppState>,
    Query(query): Query<AuthorTitleQuery>,
) -> ApiResult<Vec<Book>> {
    let author = validate::required_text("author", query.author.as_deref())?;
    let title = validate::required_text("title", query.title.as_deref())?;

    if !state.store.author_exists(author).await? {
        return Err(ApiError::not_found("Author not found"));
    }
    if !state.store.title_exists(title).await? {
        return Err(ApiError::not_found("Title not found"));
    }

    let rows = state.store.by_author_title(author, title).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No book found with that author and title"));
    }
    Ok(ApiResponse::success(books_from_rows(rows)))
}
