//! Errors returned by the query API and how they map to responses.

use crate::domain::ports::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please provide an API key in header")]
    AuthMissing,
    #[error("The provided API key is not valid")]
    AuthInvalid,
    #[error("proxy store failure: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthMissing => StatusCode::BAD_REQUEST,
            Self::AuthInvalid => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            tracing::error!("store query failed: {}", e);
        }
        let body = serde_json::json!({ "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::AuthMissing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AuthInvalid.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Store(StoreError::PoolEmpty).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_auth_missing_body() {
        let response = ApiError::AuthMissing.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Please provide an API key in header"}));
    }

    #[tokio::test]
    async fn test_auth_invalid_body() {
        let response = ApiError::AuthInvalid.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "The provided API key is not valid");
    }

    #[test]
    fn test_store_error_converts() {
        let err: ApiError = StoreError::PoolEmpty.into();
        assert!(matches!(err, ApiError::Store(StoreError::PoolEmpty)));
        assert_eq!(err.to_string(), "proxy store failure: proxy pool is empty");
    }
}
