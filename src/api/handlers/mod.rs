pub mod health;
pub mod inventory;
pub mod users;

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};

use crate::api::extractors::TraceId;
use crate::error::AppError;

// Body rejections become the shared JSON error shape instead of axum's plain text.
fn json_body<T>(trace_id: &TraceId, payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::warn!(%trace_id, error = %rejection, "rejected request body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                Err(AppError::PayloadTooLarge)
            } else {
                Err(AppError::invalid_request("invalid JSON body"))
            }
        }
    }
}
