mod book;

pub use self::book::*;
use self::book::BookRow;
use crate::env_or;
use crate::error::ConvertError;
use error_stack::{Report, ResultExt};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};

static BOOKS_FILE: &str = "BOOKS_FILE";
const DEFAULT_BOOKS_FILE: &str = "books.json";

/// Book collection stored as one JSON array in a single file.
///
/// Every clone shares the same lock, and each [`JsonFileTransaction`] holds it
/// from the initial read until commit or roll back.
#[derive(Clone)]
pub struct JsonFileDatabase {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
    books: JsonBookRepository,
}

impl JsonFileDatabase {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        let path = env_or(BOOKS_FILE, DEFAULT_BOOKS_FILE)?;
        Ok(Self::open(path))
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
            books: JsonBookRepository,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for JsonFileDatabase {
    type Transaction = JsonFileTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        let rows = read_rows(&self.path).await?;
        Ok(JsonFileTransaction {
            path: Arc::clone(&self.path),
            rows,
            modified: false,
            _guard: guard,
        })
    }
}

impl DependOnBookQuery for JsonFileDatabase {
    type BookQuery = JsonBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &self.books
    }
}

impl DependOnBookModifier for JsonFileDatabase {
    type BookModifier = JsonBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

/// In-memory copy of the collection, loaded under the database lock.
/// Dropping it without [`Transaction::commit`] discards every change.
pub struct JsonFileTransaction {
    path: Arc<PathBuf>,
    rows: Vec<BookRow>,
    modified: bool,
    _guard: OwnedMutexGuard<()>,
}

impl JsonFileTransaction {
    pub(in crate::database) fn rows(&self) -> &[BookRow] {
        &self.rows
    }

    pub(in crate::database) fn rows_mut(&mut self) -> &mut Vec<BookRow> {
        self.modified = true;
        &mut self.rows
    }
}

#[async_trait::async_trait]
impl Transaction for JsonFileTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        if !self.modified {
            return Ok(());
        }
        write_rows(&self.path, &self.rows).await?;
        tracing::debug!(
            "Wrote {} books to {}",
            self.rows.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        if self.modified {
            tracing::debug!("Discarded changes to {}", self.path.display());
        }
        Ok(())
    }
}

async fn read_rows(path: &Path) -> error_stack::Result<Vec<BookRow>, KernelError> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => {
            return Err(Report::new(error)
                .change_context(KernelError::Storage)
                .attach_printable(format!("Failed to read {}", path.display())))
        }
    };
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&data)
        .convert_error()
        .attach_printable_lazy(|| format!("Malformed book store {}", path.display()))
}

// Written next to the target and renamed over it, so the file is replaced whole.
async fn write_rows(path: &Path, rows: &[BookRow]) -> error_stack::Result<(), KernelError> {
    let data = serde_json::to_vec_pretty(rows).convert_error()?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .convert_error()
            .attach_printable_lazy(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    let replaced = match fs::write(&temp, &data).await {
        Ok(()) => fs::rename(&temp, path)
            .await
            .convert_error()
            .attach_printable_lazy(|| format!("Failed to replace {}", path.display())),
        Err(error) => Err(Report::new(error)
            .change_context(KernelError::Storage)
            .attach_printable(format!("Failed to write {}", temp.display()))),
    };
    if replaced.is_err() {
        let _ = fs::remove_file(&temp).await;
    }
    replaced
}
