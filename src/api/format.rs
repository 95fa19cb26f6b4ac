use serde::{Deserialize, Serialize};

use crate::database::models::BookRow;

/// Public wire format for a book:
/// { isbn13, authors, publication, original_title, title, ratings, icons }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub isbn13: i64,
    pub authors: String,
    pub publication: i32,
    pub original_title: String,
    pub title: String,
    pub ratings: Ratings,
    pub icons: Icons,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    pub average: f64,
    pub count: i32,
    pub rating_1: i32,
    pub rating_2: i32,
    pub rating_3: i32,
    pub rating_4: i32,
    pub rating_5: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    pub large: String,
    pub small: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            isbn13: row.isbn13,
            authors: row.authors,
            publication: row.publication_year,
            original_title: row.original_title,
            title: row.title,
            ratings: Ratings {
                average: row.rating_avg,
                count: row.rating_count,
                rating_1: row.rating_1_star,
                rating_2: row.rating_2_star,
                rating_3: row.rating_3_star,
                rating_4: row.rating_4_star,
                rating_5: row.rating_5_star,
            },
            icons: Icons {
                large: row.image_url,
                small: row.image_small_url,
            },
        }
    }
}

/// Convert a result set to API values
pub fn books_from_rows(rows: Vec<BookRow>) -> Vec<Book> {
    rows.into_iter().map(Book::from).collect()
}
