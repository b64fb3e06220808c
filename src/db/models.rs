//! Domain models for the todo store.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use serde::{Deserialize, Serialize};

use super::{DbError, DbResult, ObjectId};

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: ObjectId,
    pub text: String,
    pub completed: bool,
    /// Completion time in Unix epoch milliseconds.
    pub completed_at: Option<i64>,
}

/// Fields accepted when inserting a todo. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTodo {
    pub text: String,
}

impl NewTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}

/// Filters for listing todos. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct TodoQuery {
    /// Exact text match.
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Trim surrounding whitespace and reject empty text.
pub fn validate_text(text: &str) -> DbResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DbError::Validation {
            message: "text cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
