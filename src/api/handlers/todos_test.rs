//! Integration tests for Todo API endpoints.

use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{
    Database, NewTodo, ObjectId, SqliteDatabase, Todo, TodoQuery, TodoRepository,
};

struct TestApp {
    app: axum::Router,
    state: AppState<SqliteDatabase>,
    seeded: Vec<Todo>,
}

/// Create a test app backed by an in-memory database seeded with two todos
async fn test_app() -> TestApp {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");

    db.todos().delete_all().await.unwrap();
    let mut seeded = Vec::new();
    for text in ["First test todo", "Second test todo"] {
        seeded.push(db.todos().create(&NewTodo::new(text)).await.unwrap());
    }

    let state = AppState::new(db);
    TestApp {
        app: routes::create_router(state.clone(), false),
        state,
        seeded,
    }
}

/// Helper to parse JSON response body
async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// POST /todos - Create Todo
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_persists_new_todo() {
    let t = test_app().await;
    let text = "Test todo text";

    let response = t
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["text"], text);
    assert_eq!(body["completed"], false);
    assert!(body["completedAt"].is_null());
    assert!(body["_id"].as_str().unwrap().parse::<ObjectId>().is_ok());

    let query = TodoQuery {
        text: Some(text.to_string()),
        ..Default::default()
    };
    let todos = t.state.db().todos().list(Some(&query)).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, text);
    assert_eq!(todos[0].id.to_hex(), body["_id"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_with_empty_text_returns_bad_request() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.state.db().todos().count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_without_text_returns_bad_request() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(json_request("POST", "/todos", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].is_string());
    assert_eq!(t.state.db().todos().count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_with_whitespace_text_returns_bad_request() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(json_request("POST", "/todos", json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(t.state.db().todos().count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_with_malformed_json_is_rejected() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/todos")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(t.state.db().todos().count().await.unwrap(), 2);
}

// =============================================================================
// GET /todos - List Todos
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_returns_all_seeded() {
    let t = test_app().await;

    let response = t.app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let todos = body["todos"].as_array().expect("Expected todos array");
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["text"], "First test todo");
    assert_eq!(todos[1]["text"], "Second test todo");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_filters_by_completed() {
    let t = test_app().await;
    let id = t.seeded[1].id.to_hex();

    let response = t
        .app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", id),
            json!({ "completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/todos?completed=true"))
        .await
        .unwrap();
    let body = json_body(response).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["_id"], id);

    let response = t
        .app
        .oneshot(empty_request("GET", "/todos?completed=false"))
        .await
        .unwrap();
    let body = json_body(response).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "First test todo");
}

// =============================================================================
// GET /todos/{id} - Get Todo
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn get_todo_returns_todo_doc() {
    let t = test_app().await;
    let seeded = &t.seeded[0];

    let response = t
        .app
        .oneshot(empty_request("GET", &format!("/todos/{}", seeded.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["todo"]["text"], seeded.text);
    assert_eq!(body["todo"]["_id"], seeded.id.to_hex());
}

#[tokio::test(flavor = "multi_thread")]
async fn get_todo_returns_not_found_for_unknown_id() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(empty_request("GET", &format!("/todos/{}", ObjectId::new())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_todo_returns_not_found_for_malformed_id() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(empty_request("GET", "/todos/123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// PATCH /todos/{id} - Update Todo
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn patch_todo_completes_and_stamps_completed_at() {
    let t = test_app().await;
    let id = t.seeded[0].id;

    let response = t
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", id),
            json!({ "text": "Updated text", "completed": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["todo"]["text"], "Updated text");
    assert_eq!(body["todo"]["completed"], true);
    assert!(body["todo"]["completedAt"].is_i64());

    let stored = t.state.db().todos().get(&id).await.unwrap();
    assert!(stored.completed);
    assert_eq!(stored.text, "Updated text");
}

#[tokio::test(flavor = "multi_thread")]
async fn patch_todo_uncomplete_clears_completed_at() {
    let t = test_app().await;
    let uri = format!("/todos/{}", t.seeded[1].id);

    t.app
        .clone()
        .oneshot(json_request("PATCH", &uri, json!({ "completed": true })))
        .await
        .unwrap();

    let response = t
        .app
        .oneshot(json_request("PATCH", &uri, json!({ "completed": false })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["todo"]["completed"], false);
    assert!(body["todo"]["completedAt"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn patch_todo_with_empty_text_returns_bad_request() {
    let t = test_app().await;
    let seeded = &t.seeded[0];

    let response = t
        .app
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", seeded.id),
            json!({ "text": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stored = t.state.db().todos().get(&seeded.id).await.unwrap();
    assert_eq!(stored.text, seeded.text);
}

#[tokio::test(flavor = "multi_thread")]
async fn patch_todo_returns_not_found_for_unknown_and_malformed_ids() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/todos/{}", ObjectId::new()),
            json!({ "completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = t
        .app
        .oneshot(json_request(
            "PATCH",
            "/todos/123",
            json!({ "completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// DELETE /todos/{id} - Delete Todo
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn delete_todo_removes_and_returns_doc() {
    let t = test_app().await;
    let seeded = &t.seeded[1];
    let uri = format!("/todos/{}", seeded.id);

    let response = t
        .app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["todo"]["_id"], seeded.id.to_hex());
    assert_eq!(body["todo"]["text"], seeded.text);
    assert_eq!(t.state.db().todos().count().await.unwrap(), 1);

    let response = t.app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_todo_returns_not_found_for_unknown_id() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(empty_request(
            "DELETE",
            &format!("/todos/{}", ObjectId::new()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(t.state.db().todos().count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_todo_returns_not_found_for_malformed_id() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(empty_request("DELETE", "/todos/not-an-id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_returns_internal_error_when_store_fails() {
    let t = test_app().await;
    sqlx::query("DROP TABLE todo")
        .execute(t.state.db().pool())
        .await
        .unwrap();

    let response = t.app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Database error:"))
    );
}

#[test]
fn db_error_maps_variants_to_status_codes() {
    use super::todos::db_error;
    use crate::db::DbError;

    let (status, Json(body)) = db_error(DbError::NotFound {
        entity_type: "Todo".to_string(),
        id: "5f1d7c3e9b1e8a0012345678".to_string(),
    });
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error, "Todo '5f1d7c3e9b1e8a0012345678' not found");

    let (status, _) = db_error(DbError::Validation {
        message: "text cannot be empty".to_string(),
    });
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, Json(body)) = db_error(DbError::Migration {
        message: "checksum mismatch".to_string(),
    });
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Migration error: checksum mismatch");
}
