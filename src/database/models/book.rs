use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Flat `books` row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub isbn13: i64,
    pub authors: String,
    pub publication_year: i32,
    pub original_title: String,
    pub title: String,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub rating_1_star: i32,
    pub rating_2_star: i32,
    pub rating_3_star: i32,
    pub rating_4_star: i32,
    pub rating_5_star: i32,
    pub image_url: String,
    pub image_small_url: String,
}

/// Validated insert payload. Optional request fields are already defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub isbn13: i64,
    pub authors: String,
    pub publication_year: i32,
    pub original_title: String,
    pub title: String,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub rating_1_star: i32,
    pub rating_2_star: i32,
    pub rating_3_star: i32,
    pub rating_4_star: i32,
    pub rating_5_star: i32,
    pub image_url: String,
    pub image_small_url: String,
}

impl NewBook {
    pub fn new(isbn13: i64, authors: impl Into<String>, publication_year: i32, title: impl Into<String>) -> Self {
        Self {
            isbn13,
            authors: authors.into(),
            publication_year,
            original_title: String::new(),
            title: title.into(),
            rating_avg: 0.0,
            rating_count: 0,
            rating_1_star: 0,
            rating_2_star: 0,
            rating_3_star: 0,
            rating_4_star: 0,
            rating_5_star: 0,
            image_url: String::new(),
            image_small_url: String::new(),
        }
    }
}

/// Replacement values for `changeValues`; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub isbn13: Option<i64>,
    pub publication_year: Option<i32>,
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_none()
            && self.isbn13.is_none()
            && self.publication_year.is_none()
    }
}

/// One of the five star buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Star {
    pub fn from_rating(rating: i64) -> Option<Self> {
        match rating {
            1 => Some(Star::One),
            2 => Some(Star::Two),
            3 => Some(Star::Three),
            4 => Some(Star::Four),
            5 => Some(Star::Five),
            _ => None,
        }
    }

    /// Column holding this bucket's count. Only these literals are ever spliced into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Star::One => "rating_1_star",
            Star::Two => "rating_2_star",
            Star::Three => "rating_3_star",
            Star::Four => "rating_4_star",
            Star::Five => "rating_5_star",
        }
    }
}
