//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, CreateTodoRequest, ErrorResponse, HealthResponse, PatchTodoRequest, TodoEnvelope,
    TodoListResponse, TodoResponse,
};
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "REST API for managing todo items",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::create_todo,
        handlers::list_todos,
        handlers::get_todo,
        handlers::patch_todo,
        handlers::delete_todo,
    ),
    components(
        schemas(
            HealthResponse,
            TodoResponse,
            TodoEnvelope,
            TodoListResponse,
            CreateTodoRequest,
            PatchTodoRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "todos", description = "Todo management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router, optionally serving OpenAPI docs at /docs
pub fn create_router<D: Database + 'static>(state: AppState<D>, enable_docs: bool) -> Router {
    // All routes are generic over Database
    let router = routes!(D => {
        get "/health" => handlers::health,
        post "/todos" => handlers::create_todo,
        get "/todos" => handlers::list_todos,
        get "/todos/{id}" => handlers::get_todo,
        patch "/todos/{id}" => handlers::patch_todo,
        delete "/todos/{id}" => handlers::delete_todo,
    });

    let router = if enable_docs {
        router.merge(Scalar::with_url("/docs", ApiDoc::openapi()))
    } else {
        router
    };

    router.with_state(state)
}
