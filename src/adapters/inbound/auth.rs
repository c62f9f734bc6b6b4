//! API key gate applied to every route.
//!
//! The key travels in the `API-KEY` header. An empty configured key
//! turns the gate off entirely.

use super::api_server::ApiState;
use super::error::ApiError;
use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "API-KEY";

/// Decide whether a request may reach its handler.
///
/// Only GET requests carrying the configured key pass. A missing header
/// is reported separately from a wrong key or a non-GET method.
pub fn authorize(configured: &str, supplied: Option<&[u8]>, method: &Method) -> Result<(), ApiError> {
    if configured.is_empty() {
        return Ok(());
    }

    let supplied = supplied.ok_or(ApiError::AuthMissing)?;

    let key_matches: bool = supplied.ct_eq(configured.as_bytes()).into();
    if *method == Method::GET && key_matches {
        Ok(())
    } else {
        Err(ApiError::AuthInvalid)
    }
}

/// Axum middleware wrapping every route with [`authorize`].
pub async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|v| v.as_bytes());

    if let Err(e) = authorize(&state.api_key, supplied, request.method()) {
        tracing::debug!("rejected {} {}: {}", request.method(), request.uri(), e);
        return Err(e);
    }

    Ok(next.run(request).await)
}
