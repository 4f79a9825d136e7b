use time::Date;

use kernel::prelude::entity::{Book, DestructBook, SelectLimit, SelectOffset};

#[derive(Debug, Clone, PartialEq)]
pub struct BookDto {
    pub id: String,
    pub author_id: String,
    pub publisher_id: String,
    pub title: String,
    pub publication_date: Date,
    pub isbn: String,
    pub pages: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            author_id,
            publisher_id,
            title,
            publication_date,
            isbn,
            pages,
            genre,
            description,
            price,
            quantity,
        } = value.into_destruct();
        Self {
            id: id.into(),
            author_id: author_id.into(),
            publisher_id: publisher_id.into(),
            title: title.into(),
            publication_date: publication_date.into(),
            isbn: isbn.into(),
            pages: pages.into(),
            genre: genre.into(),
            description: description.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }
}

pub struct GetBookDto {
    pub id: String,
}

pub struct GetBookPageDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

pub struct SearchBookDto {
    pub query: String,
}

/// Fields left empty or zero are filled in by the service where a default exists.
#[derive(Debug, Clone, Default)]
pub struct CreateBookDto {
    pub id: Option<String>,
    pub author_id: String,
    pub publisher_id: String,
    pub title: String,
    pub publication_date: Option<Date>,
    pub isbn: String,
    pub pages: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

/// Whole-record replacement of the book at `path_id`.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookDto {
    pub path_id: String,
    pub id: String,
    pub author_id: String,
    pub publisher_id: String,
    pub title: String,
    pub publication_date: Option<Date>,
    pub isbn: String,
    pub pages: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

pub struct DeleteBookDto {
    pub id: String,
}
