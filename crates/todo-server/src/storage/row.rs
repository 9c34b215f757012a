//! Driver row -> `Todo` conversion
//!
//! Both drivers decode into `TodoRow`; nothing above the storage layer sees
//! driver row types.

use chrono::{DateTime, Utc};
use todo_types::Todo;

// Helper struct for sqlx query_as
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TodoRow {
    id: i64,
    title: String,
    completed: bool,
    created: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(r: TodoRow) -> Self {
        Todo {
            id: r.id,
            title: r.title,
            completed: r.completed,
            created: r.created,
        }
    }
}
