//! Request payloads

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures for todo payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
}

/// Trim a candidate title, rejecting anything that is blank afterwards.
pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(title.to_string())
}

/// Body of `POST /todos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: Option<String>,
}

impl NewTodo {
    /// The trimmed, non-empty title to insert.
    pub fn title(&self) -> Result<String, ValidationError> {
        normalize_title(self.title.as_deref().unwrap_or_default())
    }
}

/// Body of `PUT /todos/<id>`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Trim a supplied title in place; a supplied title may not be blank.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let title = self.title.as_deref().map(normalize_title).transpose()?;
        Ok(Self {
            title,
            completed: self.completed,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}
