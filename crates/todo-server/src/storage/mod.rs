//! Storage layer
//!
//! One `TodoStore` interface over two backing stores: SQLite (embedded,
//! file-backed) and PostgreSQL (client/server). The store is picked once by
//! `open` from the configuration and handed out as `Arc<dyn TodoStore>`.

pub mod postgres;
pub mod retry;
mod row;
pub mod sql;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use todo_types::{Todo, TodoPatch};

use crate::config::{StoreConfig, StoreTarget};
use crate::error::StoreError;

/// Which implementation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Todo persistence
///
/// Every method acquires its own pooled connection and returns it to the pool
/// on every exit path.
#[async_trait]
pub trait TodoStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// Create the `todos` table if it does not exist
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert a todo with an already validated title and return the stored row
    async fn insert(&self, title: &str) -> Result<Todo, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// All todos, newest first
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError>;

    /// Apply only the supplied fields; `None` when no row has this id
    async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Option<Todo>, StoreError>;

    /// Number of rows removed (0 or 1)
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;
}

/// Connect to the configured store and make sure the schema exists,
/// retrying while the store is still coming up.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn TodoStore>, StoreError> {
    tracing::info!("Opening store: {}", config.target);

    retry::with_fixed_interval(&config.retry, move |_| async move {
        let store: Arc<dyn TodoStore> = match &config.target {
            StoreTarget::Sqlite(path) => {
                Arc::new(SqliteStore::connect(path, config.max_connections).await?)
            }
            StoreTarget::Postgres(url) => {
                Arc::new(PostgresStore::connect(url, config.max_connections).await?)
            }
        };
        store.ensure_schema().await?;
        Ok::<_, StoreError>(store)
    })
    .await
}
