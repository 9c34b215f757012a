//! Todo item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted todo item.
///
/// `id` and `created` are assigned by the backing store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created: DateTime<Utc>,
}
