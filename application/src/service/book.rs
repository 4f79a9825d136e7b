use std::sync::Arc;

use error_stack::Report;
use tokio::task::JoinSet;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    AuthorId, Book, BookDescription, BookGenre, BookId, BookIsbn, BookPages, BookPrice,
    BookQuantity, BookTitle, PublicationDate, PublisherId,
};
use kernel::KernelError;

use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, GetBookPageDto, SearchBookDto,
    UpdateBookDto,
};

const SEARCH_CHUNK_SIZE: usize = 100;

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery
{
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&mut connection, &id).await?;
        connection.roll_back().await?;

        match book {
            Some(book) => Ok(BookDto::from(book)),
            None => Err(not_found(&id)),
        }
    }

    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        connection.roll_back().await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }

    /// Slice of the collection in insertion order. Out-of-range offsets and
    /// negative values yield an empty page rather than an error.
    async fn get_books_paginated(
        &self,
        dto: GetBookPageDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        connection.roll_back().await?;

        let limit = usize::try_from(i32::from(dto.limit)).unwrap_or(0);
        let offset = usize::try_from(i32::from(dto.offset)).unwrap_or(0);
        Ok(books
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(BookDto::from)
            .collect())
    }
}

impl<T> GetBookService for T where T: DependOnDatabaseConnection + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait SearchBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery
{
    /// Case-insensitive substring search over title and description.
    ///
    /// The collection is split into chunks that are matched on separate
    /// blocking workers, and matches are collected as workers finish, so the
    /// result order is unspecified. An empty query returns every book.
    async fn search_books(
        &self,
        dto: SearchBookDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let mut books = self.book_query().find_all(&mut connection).await?;
        connection.roll_back().await?;

        if dto.query.is_empty() {
            return Ok(books.into_iter().map(BookDto::from).collect());
        }

        let keyword: Arc<str> = Arc::from(dto.query.to_lowercase());
        let mut workers = JoinSet::new();
        while !books.is_empty() {
            let rest = books.split_off(SEARCH_CHUNK_SIZE.min(books.len()));
            let chunk = std::mem::replace(&mut books, rest);
            let keyword = Arc::clone(&keyword);
            workers.spawn_blocking(move || {
                chunk
                    .into_iter()
                    .filter(|book| matches_keyword(book, &keyword))
                    .collect::<Vec<Book>>()
            });
        }

        let mut found = Vec::new();
        while let Some(matched) = workers.join_next().await {
            let matched = matched.map_err(|error| {
                Report::new(error)
                    .change_context(KernelError::Internal)
                    .attach_printable("Search worker failed")
            })?;
            found.extend(matched.into_iter().map(BookDto::from));
        }
        tracing::debug!("Search {:?} matched {} books", dto.query, found.len());
        Ok(found)
    }
}

impl<T> SearchBookService for T where T: DependOnDatabaseConnection + DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        require_fields(&[
            ("title", &dto.title),
            ("authorId", &dto.author_id),
            ("publisherId", &dto.publisher_id),
            ("isbn", &dto.isbn),
        ])?;
        if dto.quantity < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("Quantity must not be negative: {}", dto.quantity)));
        }

        let mut connection = self.database_connection().transact().await?;

        let id = match dto.id.filter(|id| !id.is_empty()) {
            Some(id) => {
                let id = BookId::new(id);
                if self
                    .book_query()
                    .find_by_id(&mut connection, &id)
                    .await?
                    .is_some()
                {
                    let id: String = id.into();
                    return Err(Report::new(KernelError::Conflict)
                        .attach_printable(format!("Book {} already exists", id)));
                }
                id
            }
            None => BookId::new(Uuid::new_v4().to_string()),
        };
        let quantity = match dto.quantity {
            0 => 1,
            quantity => quantity,
        };
        let publication_date = dto
            .publication_date
            .map(PublicationDate::new)
            .filter(|date| !date.is_unset())
            .unwrap_or_else(PublicationDate::today);

        let book = Book::new(
            id,
            AuthorId::new(dto.author_id),
            PublisherId::new(dto.publisher_id),
            BookTitle::new(dto.title),
            publication_date,
            BookIsbn::new(dto.isbn),
            BookPages::new(dto.pages),
            BookGenre::new(dto.genre),
            BookDescription::new(dto.description),
            BookPrice::new(dto.price),
            BookQuantity::new(quantity),
        );
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
{
    /// Replaces the stored record wholesale; nothing is merged from the
    /// previous version, so omitted fields are stored as their zero values.
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        if dto.path_id != dto.id {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "ID in path ({}) does not match book ID ({})",
                dto.path_id, dto.id
            )));
        }

        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .is_none()
        {
            return Err(not_found(&id));
        }

        let book = Book::new(
            id,
            AuthorId::new(dto.author_id),
            PublisherId::new(dto.publisher_id),
            BookTitle::new(dto.title),
            dto.publication_date
                .map(PublicationDate::new)
                .unwrap_or_else(PublicationDate::unset),
            BookIsbn::new(dto.isbn),
            BookPages::new(dto.pages),
            BookGenre::new(dto.genre),
            BookDescription::new(dto.description),
            BookPrice::new(dto.price),
            BookQuantity::new(dto.quantity),
        );
        self.book_modifier().update(&mut connection, &book).await?;
        connection.commit().await?;

        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        if self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .is_none()
        {
            return Err(not_found(&id));
        }

        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;

        Ok(())
    }
}

impl<T> DeleteBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

fn not_found(id: &BookId) -> Report<KernelError> {
    let id: &String = id.as_ref();
    Report::new(KernelError::NotFound).attach_printable(format!("Book {} does not exist", id))
}

fn require_fields(fields: &[(&str, &String)]) -> error_stack::Result<(), KernelError> {
    let missing = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect::<Vec<&str>>();
    if missing.is_empty() {
        return Ok(());
    }
    Err(Report::new(KernelError::Validation)
        .attach_printable(format!("Missing required fields: {}", missing.join(", "))))
}

fn matches_keyword(book: &Book, keyword: &str) -> bool {
    let title: &String = book.title().as_ref();
    let description: &String = book.description().as_ref();
    title.to_lowercase().contains(keyword) || description.to_lowercase().contains(keyword)
}
