use driver::database::JsonFileDatabase;
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;
use vodca::References;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self::from(Handler::init()?))
    }
}

impl From<Handler> for AppModule {
    fn from(handler: Handler) -> Self {
        Self(Arc::new(handler))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    database: JsonFileDatabase,
}

impl Handler {
    pub fn init() -> error_stack::Result<Self, KernelError> {
        let database = JsonFileDatabase::new()?;
        tracing::info!("Using book store {}", database.path().display());

        Ok(Self::new(database))
    }

    pub fn new(database: JsonFileDatabase) -> Self {
        Self { database }
    }
}
