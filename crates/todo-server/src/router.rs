//! Method + path resolution
//!
//! Paths are matched by hand rather than through route patterns so that
//! `/todos`, `/todos/` and `//todos/3/` resolve alike and malformed ids can be
//! answered with the verb-specific error.

use axum::http::Method;

use crate::error::ApiError;

const RESOURCE: &str = "todos";

/// Shape of a request path relative to the `todos` resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePath {
    /// `todos`
    Collection,
    /// `todos/<digits>`
    Item(i64),
    /// `todos/...` with anything other than a single numeric segment
    MalformedItem,
    /// Anything not under `todos`
    Unknown,
}

impl ResourcePath {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            [RESOURCE] => ResourcePath::Collection,
            [RESOURCE, id] => parse_id(id).map_or(ResourcePath::MalformedItem, ResourcePath::Item),
            [RESOURCE, ..] => ResourcePath::MalformedItem,
            _ => ResourcePath::Unknown,
        }
    }
}

fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// What a request asks the server to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    List,
    Get(i64),
    Create,
    Update(i64),
    Delete(i64),
}

pub fn resolve(method: &Method, path: &str) -> Result<Route, ApiError> {
    if *method == Method::OPTIONS {
        return Ok(Route::Preflight);
    }

    let target = ResourcePath::parse(path);
    if target == ResourcePath::Unknown {
        return Err(ApiError::NotFound);
    }

    match *method {
        Method::GET => match target {
            ResourcePath::Collection => Ok(Route::List),
            ResourcePath::Item(id) => Ok(Route::Get(id)),
            _ => Err(ApiError::NotFound),
        },
        Method::POST => Ok(Route::Create),
        Method::PUT => match target {
            ResourcePath::Item(id) => Ok(Route::Update(id)),
            _ => Err(ApiError::BadRequest("PUT /todos/<id>".to_string())),
        },
        Method::DELETE => match target {
            ResourcePath::Item(id) => Ok(Route::Delete(id)),
            _ => Err(ApiError::BadRequest("DELETE /todos/<id>".to_string())),
        },
        _ => Err(ApiError::NotFound),
    }
}
