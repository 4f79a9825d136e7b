use crate::controller::Intake;
use application::transfer::{
    CreateBookDto, DeleteBookDto, GetBookDto, GetBookPageDto, SearchBookDto, UpdateBookDto,
};
use kernel::prelude::entity::{PublicationDate, SelectLimit, SelectOffset};
use serde::{Deserialize, Deserializer};

/// Body of both `POST /books` and `PUT /books/:id`. Absent fields decode to
/// their zero values and are checked by the services.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookRequest {
    book_id: String,
    author_id: String,
    publisher_id: String,
    title: String,
    #[serde(deserialize_with = "blank_date_as_none")]
    publication_date: Option<PublicationDate>,
    isbn: String,
    pages: i32,
    genre: String,
    description: String,
    price: f64,
    quantity: i32,
}

fn blank_date_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PublicationDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => PublicationDate::parse(text).map(Some).map_err(|_| {
            serde::de::Error::custom("invalid publicationDate format, expected YYYY-MM-DD")
        }),
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: String,
}

impl DeleteBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

// Without either parameter the whole collection is listed. Values are kept raw
// so blank or non-numeric ones fall back to the paging defaults.
#[derive(Debug, Deserialize)]
pub struct GetAllBookRequest {
    limit: Option<String>,
    offset: Option<String>,
}

fn parse_page_param(value: Option<String>) -> Option<i32> {
    value.and_then(|value| value.trim().parse::<i32>().ok())
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: String,
}

impl GetBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBookRequest {
    #[serde(default)]
    q: String,
}

pub struct BookTransformer;

impl Intake<BookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: BookRequest) -> Self::To {
        CreateBookDto {
            id: Some(input.book_id).filter(|id| !id.is_empty()),
            author_id: input.author_id,
            publisher_id: input.publisher_id,
            title: input.title,
            publication_date: input.publication_date.map(Into::into),
            isbn: input.isbn,
            pages: input.pages,
            genre: input.genre,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
        }
    }
}

impl Intake<(String, BookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (String, BookRequest)) -> Self::To {
        let (path_id, input) = input;
        UpdateBookDto {
            path_id,
            id: input.book_id,
            author_id: input.author_id,
            publisher_id: input.publisher_id,
            title: input.title,
            publication_date: input.publication_date.map(Into::into),
            isbn: input.isbn,
            pages: input.pages,
            genre: input.genre,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetAllBookRequest> for BookTransformer {
    type To = Option<GetBookPageDto>;
    fn emit(&self, input: GetAllBookRequest) -> Self::To {
        if input.limit.is_none() && input.offset.is_none() {
            return None;
        }
        Some(GetBookPageDto {
            limit: parse_page_param(input.limit)
                .filter(|limit| *limit > 0)
                .map(SelectLimit::new)
                .unwrap_or_default(),
            offset: parse_page_param(input.offset)
                .filter(|offset| *offset >= 0)
                .map(SelectOffset::new)
                .unwrap_or_default(),
        })
    }
}

impl Intake<SearchBookRequest> for BookTransformer {
    type To = SearchBookDto;
    fn emit(&self, input: SearchBookRequest) -> Self::To {
        SearchBookDto { query: input.q }
    }
}
