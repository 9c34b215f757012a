//! SQLite store (embedded, file-backed)
//!
//! The SQLite driver hands back no rows from writes, so inserts and updates
//! read the row back on the same connection.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use todo_types::{Todo, TodoPatch};

use super::row::TodoRow;
use super::sql::Dialect;
use super::{Backend, TodoStore};
use crate::error::StoreError;

const DIALECT: Dialect = Dialect::Sqlite;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        tracing::info!("Opening SQLite database at: {}", database_path.display());

        // Create parent directory if needed
        if let Some(parent) = database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::info!("SQLite connection established");

        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(DIALECT.create_table())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn insert(&self, title: &str) -> Result<Todo, StoreError> {
        let mut conn = self.pool.acquire().await?;

        let id = sqlx::query(&DIALECT.insert())
            .bind(title)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        let row: TodoRow = sqlx::query_as(&DIALECT.select_by_id())
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<TodoRow> = sqlx::query_as(&DIALECT.select_by_id())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<TodoRow> = sqlx::query_as(&DIALECT.select_all())
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.pool.acquire().await?;

        if !patch.is_empty() {
            let affected = sqlx::query(&DIALECT.update())
                .bind(patch.title.as_deref())
                .bind(patch.completed)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            if affected == 0 {
                return Ok(None);
            }
        }

        let row: Option<TodoRow> = sqlx::query_as(&DIALECT.select_by_id())
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(&DIALECT.delete())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(&dir.path().join("todos.db"), 2)
            .await
            .unwrap();
        store.ensure_schema().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let (_dir, store) = store().await;

        tokio_test::assert_ok!(store.ensure_schema().await);
        tokio_test::assert_ok!(store.ensure_schema().await);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schema_creation_keeps_rows() {
        let (_dir, store) = store().await;
        store.insert("keep me").await.unwrap();

        store.ensure_schema().await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("todos.db");

        let store = SqliteStore::connect(&path, 1).await.unwrap();
        store.ensure_schema().await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let (_dir, store) = store().await;

        let created = store.insert("Buy milk").await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Buy milk");
        assert!(!created.completed);

        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (_dir, store) = store().await;
        assert_eq!(store.get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = store().await;
        let a = store.insert("A").await.unwrap();
        let b = store.insert("B").await.unwrap();
        let c = store.insert("C").await.unwrap();

        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_title() {
        let (_dir, store) = store().await;
        let todo = store.insert("T0").await.unwrap();

        let patch = TodoPatch {
            title: None,
            completed: Some(true),
        };
        let updated = store.update(todo.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.title, "T0");
        assert!(updated.completed);
        assert_eq!(updated.created, todo.created);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_completed() {
        let (_dir, store) = store().await;
        let todo = store.insert("T0").await.unwrap();
        store
            .update(todo.id, &TodoPatch { title: None, completed: Some(true) })
            .await
            .unwrap();

        let patch = TodoPatch {
            title: Some("T1".to_string()),
            completed: None,
        };
        let updated = store.update(todo.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.title, "T1");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let (_dir, store) = store().await;
        let patch = TodoPatch {
            title: Some("x".to_string()),
            completed: None,
        };
        assert_eq!(store.update(42, &patch).await.unwrap(), None);
        assert_eq!(store.update(42, &TodoPatch::default()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let (_dir, store) = store().await;
        let todo = store.insert("gone").await.unwrap();

        assert_eq!(store.delete(todo.id).await.unwrap(), 1);
        assert_eq!(store.delete(todo.id).await.unwrap(), 0);
        assert_eq!(store.get_by_id(todo.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let (_dir, store) = store().await;
        let first = store.insert("first").await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.insert("second").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_titles_are_bound_not_interpolated() {
        let (_dir, store) = store().await;
        let hostile = "x'); DROP TABLE todos; --";

        let todo = store.insert(hostile).await.unwrap();

        assert_eq!(todo.title, hostile);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
