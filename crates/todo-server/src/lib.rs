//! Todo Server
//!
//! Serves the `todos` resource over HTTP from either an embedded SQLite file
//! or a PostgreSQL server, chosen once at startup.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod storage;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue},
    BoxError, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use config::HttpConfig;
use error::ApiError;
use storage::TodoStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

/// Build the HTTP application.
///
/// Every response, errors and timeouts included, carries the JSON content
/// type and the permissive CORS headers.
pub fn app(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .fallback(handlers::dispatch)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ))
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(http.request_timeout))
                .layer(ConcurrencyLimitLayer::new(http.max_in_flight)),
        )
        .with_state(state)
}

/// Turn errors raised by the timeout layer into the JSON error envelope
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_elapsed_maps_to_timeout() {
        let err = handle_middleware_error(Box::new(Elapsed::new())).await;
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_other_layer_errors_are_internal() {
        let err = handle_middleware_error("boom".into()).await;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
