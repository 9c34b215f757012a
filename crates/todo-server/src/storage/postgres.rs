//! PostgreSQL store (client/server)

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use todo_types::{Todo, TodoPatch};

use super::row::TodoRow;
use super::sql::Dialect;
use super::{Backend, TodoStore};
use crate::error::StoreError;

const DIALECT: Dialect = Dialect::Postgres;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        tracing::info!("PostgreSQL connection established");

        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for PostgresStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
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
        let row: TodoRow = sqlx::query_as(&DIALECT.insert())
            .bind(title)
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
        let row: Option<TodoRow> = sqlx::query_as(&DIALECT.update())
            .bind(patch.title.as_deref())
            .bind(patch.completed)
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
