use error_stack::Report;
use serde::{Deserialize, Serialize};

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AuthorId, Book, BookDescription, BookGenre, BookId, BookIsbn, BookPages, BookPrice,
    BookQuantity, BookTitle, DestructBook, PublicationDate, PublisherId,
};
use kernel::KernelError;

use crate::database::json::JsonFileTransaction;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBookRepository;

#[async_trait::async_trait]
impl BookQuery for JsonBookRepository {
    type Transaction = JsonFileTransaction;

    async fn find_all(
        &self,
        con: &mut JsonFileTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(JsonBookInternal::find_all(con))
    }

    async fn find_by_id(
        &self,
        con: &mut JsonFileTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(JsonBookInternal::find_by_id(con, id))
    }
}

#[async_trait::async_trait]
impl BookModifier for JsonBookRepository {
    type Transaction = JsonFileTransaction;

    async fn create(
        &self,
        con: &mut JsonFileTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        JsonBookInternal::create(con, book);
        Ok(())
    }

    async fn update(
        &self,
        con: &mut JsonFileTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        JsonBookInternal::update(con, book)
    }

    async fn delete(
        &self,
        con: &mut JsonFileTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        JsonBookInternal::delete(con, book_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(in crate::database) struct BookRow {
    book_id: String,
    author_id: String,
    publisher_id: String,
    title: String,
    publication_date: PublicationDate,
    isbn: String,
    pages: i32,
    genre: String,
    description: String,
    price: f64,
    quantity: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.book_id),
            AuthorId::new(value.author_id),
            PublisherId::new(value.publisher_id),
            BookTitle::new(value.title),
            value.publication_date,
            BookIsbn::new(value.isbn),
            BookPages::new(value.pages),
            BookGenre::new(value.genre),
            BookDescription::new(value.description),
            BookPrice::new(value.price),
            BookQuantity::new(value.quantity),
        )
    }
}

impl From<Book> for BookRow {
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
            book_id: id.into(),
            author_id: author_id.into(),
            publisher_id: publisher_id.into(),
            title: title.into(),
            publication_date,
            isbn: isbn.into(),
            pages: pages.into(),
            genre: genre.into(),
            description: description.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }
}

pub(in crate::database) struct JsonBookInternal;

impl JsonBookInternal {
    fn find_all(con: &JsonFileTransaction) -> Vec<Book> {
        con.rows().iter().cloned().map(Book::from).collect()
    }

    fn find_by_id(con: &JsonFileTransaction, id: &BookId) -> Option<Book> {
        let id: &String = id.as_ref();
        con.rows()
            .iter()
            .find(|row| row.book_id == *id)
            .cloned()
            .map(Book::from)
    }

    fn create(con: &mut JsonFileTransaction, book: &Book) {
        con.rows_mut().push(BookRow::from(book.clone()));
    }

    fn update(con: &mut JsonFileTransaction, book: &Book) -> error_stack::Result<(), KernelError> {
        let id: &String = book.id().as_ref();
        let position = Self::position(con, id)?;
        con.rows_mut()[position] = BookRow::from(book.clone());
        Ok(())
    }

    fn delete(
        con: &mut JsonFileTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        let id: &String = book_id.as_ref();
        let position = Self::position(con, id)?;
        con.rows_mut().remove(position);
        Ok(())
    }

    fn position(con: &JsonFileTransaction, id: &str) -> error_stack::Result<usize, KernelError> {
        con.rows()
            .iter()
            .position(|row| row.book_id == id)
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("Book {} is not stored", id))
            })
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;
    use time::macros::date;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        AuthorId, Book, BookDescription, BookGenre, BookId, BookIsbn, BookPages, BookPrice,
        BookQuantity, BookTitle, PublicationDate, PublisherId,
    };
    use kernel::KernelError;

    use crate::database::json::book::JsonBookRepository;
    use crate::database::json::JsonFileDatabase;

    fn book(id: &str, title: &str) -> Book {
        Book::new(
            BookId::new(id),
            AuthorId::new("author-1"),
            PublisherId::new("publisher-1"),
            BookTitle::new(title),
            PublicationDate::new(date!(1965 - 08 - 01)),
            BookIsbn::new("978-0441013593"),
            BookPages::new(412),
            BookGenre::new("Science Fiction"),
            BookDescription::new("Desert planet"),
            BookPrice::new(9.99),
            BookQuantity::new(3),
        )
    }

    fn database(dir: &TempDir) -> JsonFileDatabase {
        JsonFileDatabase::open(dir.path().join("books.json"))
    }

    #[tokio::test]
    async fn missing_or_empty_file_is_empty_collection() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let mut con = db.transact().await?;
        assert!(JsonBookRepository.find_all(&mut con).await?.is_empty());
        con.roll_back().await?;

        std::fs::write(db.path(), "").unwrap();
        let mut con = db.transact().await?;
        assert!(JsonBookRepository.find_all(&mut con).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn crud_cycle() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let id = BookId::new("dune");
        let book = book("dune", "Dune");

        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = JsonBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        let book = book.reconstruct(|b| b.title = BookTitle::new("Dune Messiah"));
        JsonBookRepository.update(&mut con, &book).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = JsonBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book));

        JsonBookRepository.delete(&mut con, &id).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = JsonBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_insertion_position() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let mut con = db.transact().await?;
        for (id, title) in [("a", "First"), ("b", "Second"), ("c", "Third")] {
            JsonBookRepository.create(&mut con, &book(id, title)).await?;
        }
        JsonBookRepository
            .update(&mut con, &book("b", "Second, revised"))
            .await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let titles = JsonBookRepository
            .find_all(&mut con)
            .await?
            .into_iter()
            .map(|book| String::from(book.title().clone()))
            .collect::<Vec<String>>();
        assert_eq!(titles, ["First", "Second, revised", "Third"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_unknown_id_is_not_found() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let mut con = db.transact().await?;

        let updated = JsonBookRepository.update(&mut con, &book("ghost", "Ghost")).await;
        assert_eq!(
            updated.unwrap_err().current_context(),
            &KernelError::NotFound
        );

        let deleted = JsonBookRepository
            .delete(&mut con, &BookId::new("ghost"))
            .await;
        assert_eq!(
            deleted.unwrap_err().current_context(),
            &KernelError::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_writes_nothing() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        {
            let mut con = db.transact().await?;
            JsonBookRepository.create(&mut con, &book("a", "A")).await?;
        }
        assert!(!db.path().exists());

        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book("b", "B")).await?;
        con.roll_back().await?;
        assert!(!db.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_file() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book("a", "A")).await?;
        con.commit().await?;
        let before = std::fs::read_to_string(db.path()).unwrap();

        // A directory in the way of the temp file makes the write fail.
        let temp = dir.path().join("books.json.tmp");
        std::fs::create_dir(&temp).unwrap();
        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book("b", "B")).await?;
        let committed = con.commit().await;
        assert_eq!(
            committed.err().map(|report| *report.current_context()),
            Some(KernelError::Storage)
        );
        assert_eq!(std::fs::read_to_string(db.path()).unwrap(), before);

        std::fs::remove_dir(&temp).unwrap();
        let mut con = db.transact().await?;
        let ids = JsonBookRepository
            .find_all(&mut con)
            .await?
            .into_iter()
            .map(|book| String::from(book.id().clone()))
            .collect::<Vec<String>>();
        assert_eq!(ids, ["a"]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_replace_leaves_no_temp_file() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book("a", "A")).await?;
        // A non-empty directory now sits where the store file is renamed to.
        std::fs::create_dir(db.path()).unwrap();
        std::fs::write(db.path().join("keep"), "").unwrap();

        let committed = con.commit().await;
        assert_eq!(
            committed.err().map(|report| *report.current_context()),
            Some(KernelError::Storage)
        );
        assert!(!dir.path().join("books.json.tmp").exists());
        assert!(db.path().join("keep").exists());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_storage_error_and_untouched() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        std::fs::write(db.path(), "{ not json").unwrap();

        let result = db.transact().await;
        assert_eq!(
            result.err().map(|report| *report.current_context()),
            Some(KernelError::Storage)
        );
        assert_eq!(std::fs::read_to_string(db.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn persisted_layout_is_camel_case_array() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = JsonFileDatabase::open(dir.path().join("nested").join("books.json"));

        let mut con = db.transact().await?;
        JsonBookRepository.create(&mut con, &book("dune", "Dune")).await?;
        con.commit().await?;

        let raw = std::fs::read_to_string(db.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &value.as_array().unwrap()[0];
        assert_eq!(record["bookId"], "dune");
        assert_eq!(record["authorId"], "author-1");
        assert_eq!(record["publisherId"], "publisher-1");
        assert_eq!(record["publicationDate"], "1965-08-01");
        assert_eq!(record["quantity"], 3);
        assert!(raw.contains("\n  {"));
        Ok(())
    }

    #[tokio::test]
    async fn tolerates_records_with_missing_optional_fields() -> error_stack::Result<(), KernelError> {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        std::fs::write(
            db.path(),
            r#"[{"bookId":"x","authorId":"a","publisherId":"p","title":"T","isbn":"i","publicationDate":"2020-02-29"}]"#,
        )
        .unwrap();

        let mut con = db.transact().await?;
        let books = JsonBookRepository.find_all(&mut con).await?;
        assert_eq!(books.len(), 1);
        assert_eq!(
            books[0].publication_date(),
            &PublicationDate::new(date!(2020 - 02 - 29))
        );
        assert_eq!(books[0].quantity(), &BookQuantity::new(0));
        Ok(())
    }
}
