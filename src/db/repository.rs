//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.

use std::future::Future;

use crate::db::{
    DbResult, ObjectId,
    models::{NewTodo, Todo, TodoPatch, TodoQuery},
};

/// Repository for Todo operations.
pub trait TodoRepository: Send + Sync {
    /// Insert a new todo. The repository assigns its id.
    fn create(&self, todo: &NewTodo) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Get a todo by ID.
    fn get(&self, id: &ObjectId) -> impl Future<Output = DbResult<Todo>> + Send;

    /// List todos in insertion order, optionally filtered.
    fn list(&self, query: Option<&TodoQuery>) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Apply a partial update and return the updated todo.
    fn update(
        &self,
        id: &ObjectId,
        patch: &TodoPatch,
    ) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Delete a todo by ID, returning the removed todo.
    fn delete(&self, id: &ObjectId) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Delete every todo, returning how many were removed.
    fn delete_all(&self) -> impl Future<Output = DbResult<u64>> + Send;

    /// Count all todos.
    fn count(&self) -> impl Future<Output = DbResult<u64>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Todos<'a>: TodoRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos<'_>;
}
