mod author_id;
mod description;
mod genre;
mod id;
mod isbn;
mod pages;
mod price;
mod publication_date;
mod publisher_id;
mod quantity;
mod title;

pub use self::{
    author_id::*, description::*, genre::*, id::*, isbn::*, pages::*, price::*,
    publication_date::*, publisher_id::*, quantity::*, title::*,
};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
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

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
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
    ) -> Self {
        Self {
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
        }
    }
}
