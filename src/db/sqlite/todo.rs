//! SQLite TodoRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::db::utils::current_timestamp_millis;
use crate::db::{
    DbError, DbResult, NewTodo, ObjectId, Todo, TodoPatch, TodoQuery, TodoRepository,
    validate_text,
};

const SELECT_COLUMNS: &str = "SELECT id, text, completed, completed_at FROM todo";

/// SQLx-backed todo repository.
pub struct SqliteTodoRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn not_found(id: &ObjectId) -> DbError {
    DbError::NotFound {
        entity_type: "Todo".to_string(),
        id: id.to_hex(),
    }
}

fn row_to_todo(row: &SqliteRow) -> DbResult<Todo> {
    let id: String = row.get("id");
    let id = id.parse::<ObjectId>().map_err(|e| DbError::Database {
        message: e.to_string(),
    })?;

    Ok(Todo {
        id,
        text: row.get("text"),
        completed: row.get("completed"),
        completed_at: row.get("completed_at"),
    })
}

impl<'a> TodoRepository for SqliteTodoRepository<'a> {
    async fn create(&self, todo: &NewTodo) -> DbResult<Todo> {
        let text = validate_text(&todo.text)?;
        let id = ObjectId::new();

        sqlx::query("INSERT INTO todo (id, text, completed, completed_at) VALUES (?, ?, 0, NULL)")
            .bind(id.to_hex())
            .bind(&text)
            .execute(self.pool)
            .await?;

        Ok(Todo {
            id,
            text,
            completed: false,
            completed_at: None,
        })
    }

    async fn get(&self, id: &ObjectId) -> DbResult<Todo> {
        let row = sqlx::query("SELECT id, text, completed, completed_at FROM todo WHERE id = ?")
            .bind(id.to_hex())
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| not_found(id))?;
        row_to_todo(&row)
    }

    async fn list(&self, query: Option<&TodoQuery>) -> DbResult<Vec<Todo>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);

        if let Some(query) = query {
            let mut keyword = " WHERE ";
            if let Some(text) = &query.text {
                builder.push(keyword).push("text = ").push_bind(text.clone());
                keyword = " AND ";
            }
            if let Some(completed) = query.completed {
                builder.push(keyword).push("completed = ").push_bind(completed);
            }
        }

        builder.push(" ORDER BY seq ASC");

        let rows = builder.build().fetch_all(self.pool).await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn update(&self, id: &ObjectId, patch: &TodoPatch) -> DbResult<Todo> {
        let mut todo = self.get(id).await?;

        if patch.is_empty() {
            return Ok(todo);
        }

        if let Some(text) = &patch.text {
            todo.text = validate_text(text)?;
        }

        match patch.completed {
            Some(true) => {
                todo.completed = true;
                todo.completed_at = Some(current_timestamp_millis());
            }
            Some(false) => {
                todo.completed = false;
                todo.completed_at = None;
            }
            None => {}
        }

        let result =
            sqlx::query("UPDATE todo SET text = ?, completed = ?, completed_at = ? WHERE id = ?")
                .bind(&todo.text)
                .bind(todo.completed)
                .bind(todo.completed_at)
                .bind(id.to_hex())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(todo)
    }

    async fn delete(&self, id: &ObjectId) -> DbResult<Todo> {
        let todo = self.get(id).await?;

        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id.to_hex())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(todo)
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM todo").execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo")
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }
}
