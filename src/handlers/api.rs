use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{CreateTodo, ListQuery, Todo, TodoPatch, UpdateTodo};
use crate::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.store.list_by_status(query.status)?;
    info!(count = todos.len(), status = ?query.status, "Listed todos");
    Ok(Json(todos))
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty"));
    }

    let patch = TodoPatch {
        id: req.id.unwrap_or_else(now_millis),
        title: Some(req.title),
        done_at: None,
    };

    let todo = state.store.upsert(&patch)?;
    info!(id = todo.id, title = %todo.title, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodo>,
) -> Result<Json<Todo>, AppError> {
    let patch = TodoPatch {
        id,
        title: req.title,
        done_at: req.done_at,
    };

    // Upsert semantics: a patch against an absent id creates the record.
    let todo = state.store.upsert(&patch)?;
    info!(id = todo.id, done = todo.done_at.is_some(), "Updated todo");
    Ok(Json(todo))
}

pub async fn delete_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.remove(id)? {
        info!(id, "Deleted todo");
    } else {
        warn!(id, "Delete of unknown todo ignored");
    }
    Ok(StatusCode::NO_CONTENT)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
