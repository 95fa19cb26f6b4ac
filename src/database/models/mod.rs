pub mod book;

pub use book::{BookChanges, BookRow, NewBook, Star};
