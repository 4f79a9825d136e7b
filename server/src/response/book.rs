use crate::controller::Exhaust;
use application::transfer::BookDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::{
    AuthorId, BookDescription, BookGenre, BookId, BookIsbn, BookPages, BookPrice, BookQuantity,
    BookTitle, PublicationDate, PublisherId,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    book_id: BookId,
    author_id: AuthorId,
    publisher_id: PublisherId,
    title: BookTitle,
    publication_date: PublicationDate,
    isbn: BookIsbn,
    pages: BookPages,
    genre: BookGenre,
    description: BookDescription,
    price: BookPrice,
    quantity: BookQuantity,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            book_id: BookId::new(value.id),
            author_id: AuthorId::new(value.author_id),
            publisher_id: PublisherId::new(value.publisher_id),
            title: BookTitle::new(value.title),
            publication_date: PublicationDate::new(value.publication_date),
            isbn: BookIsbn::new(value.isbn),
            pages: BookPages::new(value.pages),
            genre: BookGenre::new(value.genre),
            description: BookDescription::new(value.description),
            price: BookPrice::new(value.price),
            quantity: BookQuantity::new(value.quantity),
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<()> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = axum::Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(BookResponse::from)
            .collect::<Vec<_>>();

        axum::Json::from(result)
    }
}
