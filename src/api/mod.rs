pub mod format;

pub use format::{books_from_rows, Book, Icons, Ratings};
