//! Todo handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use todo_types::{Deleted, NewTodo, TodoPatch};

use crate::error::ApiError;
use crate::AppState;

/// Decode a JSON body; an empty body reads as `{}`
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.is_empty() { b"{}".as_slice() } else { body };
    Ok(serde_json::from_slice(body)?)
}

pub async fn list(state: &AppState) -> Result<Response, ApiError> {
    let todos = state.store.list_all().await?;
    Ok(Json(todos).into_response())
}

pub async fn get(state: &AppState, id: i64) -> Result<Response, ApiError> {
    let todo = state
        .store
        .get_by_id(id)
        .await?
        .ok_or(ApiError::TodoNotFound)?;
    Ok(Json(todo).into_response())
}

pub async fn create(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let input: NewTodo = parse_body(body)?;
    let title = input.title()?;

    let todo = state.store.insert(&title).await?;
    tracing::info!(id = todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

pub async fn update(state: &AppState, id: i64, body: &[u8]) -> Result<Response, ApiError> {
    let patch = parse_body::<TodoPatch>(body)?.normalized()?;

    let todo = state
        .store
        .update(id, &patch)
        .await?
        .ok_or(ApiError::TodoNotFound)?;
    Ok(Json(todo).into_response())
}

pub async fn delete(state: &AppState, id: i64) -> Result<Response, ApiError> {
    if state.store.delete(id).await? == 0 {
        return Err(ApiError::TodoNotFound);
    }
    tracing::info!(id, "Todo deleted");

    Ok(Json(Deleted { deleted: id }).into_response())
}
