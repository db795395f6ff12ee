/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status + JSON error body)
 * - Only generic messages cross the trust boundary; causes are logged where they happen
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::StoreError;
use crate::services::auth::{SigningError, TokenInvalid};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("conflict")]
    Conflict,

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("request timed out")]
    Timeout,

    /// The trace stage did not run before a stage that needs it (wiring bug).
    #[error("trace id missing from request context")]
    TraceMissing,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::Conflict => (StatusCode::CONFLICT, "CONFLICT", "conflict".into()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "request timed out".into(),
            ),
            AppError::TraceMissing | AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponseBody {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TokenInvalid> for AppError {
    fn from(_: TokenInvalid) -> Self {
        AppError::Unauthorized
    }
}

impl From<SigningError> for AppError {
    fn from(_: SigningError) -> Self {
        AppError::Internal
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AppError::Conflict,
            StoreError::InvalidCredentials => AppError::Unauthorized,
            StoreError::Db(_) | StoreError::PasswordHash(_) => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_body_is_opaque() {
        let (status, body) = render(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"error": {"code": "UNAUTHORIZED", "message": "unauthorized"}})
        );
    }

    #[tokio::test]
    async fn trace_missing_does_not_leak_detail() {
        let (status, body) = render(AppError::TraceMissing).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn invalid_request_keeps_its_message() {
        let (status, body) = render(AppError::invalid_request("email is required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "email is required");
    }

    #[tokio::test]
    async fn transport_errors_use_the_json_body() {
        let (status, body) = render(AppError::Timeout).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error"]["code"], "REQUEST_TIMEOUT");

        let (status, body) = render(AppError::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn store_errors_map_to_http_meaning() {
        assert!(matches!(
            AppError::from(StoreError::DuplicateEmail),
            AppError::Conflict
        ));
        assert!(matches!(
            AppError::from(StoreError::InvalidCredentials),
            AppError::Unauthorized
        ));
    }
}
