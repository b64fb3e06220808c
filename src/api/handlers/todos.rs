//! Todo management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::api::AppState;
use crate::db::{Database, DbError, NewTodo, ObjectId, Todo, TodoPatch, TodoQuery, TodoRepository};

use super::{ErrorResponse, error_response};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Todo document
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoResponse {
    /// Document id (24-character hex)
    #[serde(rename = "_id")]
    #[schema(example = "5f1d7c3e9b1e8a0012345678")]
    pub id: String,
    /// Todo text
    #[schema(example = "Walk the dog")]
    pub text: String,
    /// Whether the todo has been completed
    #[schema(example = false)]
    pub completed: bool,
    /// Completion time in Unix epoch milliseconds
    #[serde(rename = "completedAt")]
    #[schema(example = json!(null))]
    pub completed_at: Option<i64>,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id.to_hex(),
            text: t.text,
            completed: t.completed,
            completed_at: t.completed_at,
        }
    }
}

/// Single todo wrapped in an envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoEnvelope {
    pub todo: TodoResponse,
}

/// List of todos wrapped in an envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
}

/// Create todo request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Todo text (required, non-empty)
    #[schema(example = "Walk the dog")]
    pub text: Option<String>,
}

/// Patch todo request DTO
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchTodoRequest {
    /// New text (non-empty)
    #[schema(example = "Walk the cat")]
    pub text: Option<String>,
    /// Mark as completed or not completed
    #[schema(example = true)]
    pub completed: Option<bool>,
}

impl From<PatchTodoRequest> for TodoPatch {
    fn from(req: PatchTodoRequest) -> Self {
        Self {
            text: req.text,
            completed: req.completed,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTodosQuery {
    /// Filter by completion state
    #[param(example = false)]
    pub completed: Option<bool>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a path id. Malformed ids are reported as not found.
fn parse_id(id: &str) -> Result<ObjectId, (StatusCode, Json<ErrorResponse>)> {
    id.parse::<ObjectId>().map_err(|_| {
        warn!("Rejecting malformed todo id '{}'", id);
        error_response(StatusCode::NOT_FOUND, format!("Todo '{}' not found", id))
    })
}

/// Map a database error to a response.
pub(super) fn db_error(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        DbError::NotFound { ref id, .. } => {
            error_response(StatusCode::NOT_FOUND, format!("Todo '{}' not found", id))
        }
        DbError::Validation { .. } => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new todo
///
/// Stores a todo and returns the stored document
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid todo", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todo<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<Json<TodoResponse>, (StatusCode, Json<ErrorResponse>)> {
    let new_todo = NewTodo::new(req.text.unwrap_or_default());

    let todo = state
        .db()
        .todos()
        .create(&new_todo)
        .await
        .map_err(db_error)?;

    info!("Created todo {}", todo.id);
    Ok(Json(TodoResponse::from(todo)))
}

/// List all todos
///
/// Returns every todo in insertion order
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "List of todos", body = TodoListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todos<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<TodoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let db_query = TodoQuery {
        completed: query.completed,
        ..Default::default()
    };

    let todos = state
        .db()
        .todos()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(TodoListResponse {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    }))
}

/// Get a todo by ID
///
/// Returns a single todo. Malformed ids are reported as not found.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Todo found", body = TodoEnvelope),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;

    let todo = state.db().todos().get(&id).await.map_err(db_error)?;

    Ok(Json(TodoEnvelope {
        todo: TodoResponse::from(todo),
    }))
}

/// Update a todo
///
/// Changes the text and/or completion state. Completing a todo stamps
/// `completedAt`; un-completing clears it.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID (24-character hex)")
    ),
    request_body = PatchTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoEnvelope),
        (status = 400, description = "Invalid todo", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<PatchTodoRequest>,
) -> Result<Json<TodoEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;
    let patch = TodoPatch::from(req);

    let todo = state
        .db()
        .todos()
        .update(&id, &patch)
        .await
        .map_err(db_error)?;

    info!("Updated todo {}", todo.id);
    Ok(Json(TodoEnvelope {
        todo: TodoResponse::from(todo),
    }))
}

/// Delete a todo
///
/// Removes a todo and returns the removed document
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = TodoEnvelope),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;

    let todo = state.db().todos().delete(&id).await.map_err(db_error)?;

    info!("Deleted todo {}", todo.id);
    Ok(Json(TodoEnvelope {
        todo: TodoResponse::from(todo),
    }))
}
