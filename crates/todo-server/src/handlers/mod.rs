//! HTTP handlers

pub mod todos;

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::error::ApiError;
use crate::router::{self, Route};
use crate::AppState;

/// Single entry point for every request
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let path = uri.path();
    tracing::info!(method = %method, path = %path, "Incoming request");

    match handle(&state, &method, path, body).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(method = %method, path = %path, error = %e, "Request rejected");
            e.into_response()
        }
    }
}

async fn handle(
    state: &AppState,
    method: &Method,
    path: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    match router::resolve(method, path)? {
        Route::Preflight => Ok(StatusCode::NO_CONTENT.into_response()),
        Route::List => todos::list(state).await,
        Route::Get(id) => todos::get(state, id).await,
        Route::Create => todos::create(state, &body?).await,
        Route::Update(id) => todos::update(state, id, &body?).await,
        Route::Delete(id) => todos::delete(state, id).await,
    }
}
