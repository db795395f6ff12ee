/*
 * Responsibility
 * - /signup: validate → hash password → create user
 * - /login: validate → authenticate → issue a signed access token
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    api::dto::users::{LoginRequest, SignupRequest, TokenResponse, UserResponse},
    api::extractors::Traced,
    error::AppError,
    repos::{error::StoreError, store::NewUser},
    services::password,
    state::AppState,
};

use super::json_body;

pub async fn signup(
    Traced(trace_id): Traced,
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let req = json_body(&trace_id, payload)?;
    req.validate().map_err(AppError::invalid_request)?;

    let password_hash = password::hash(req.password).await.map_err(|e| {
        tracing::error!(%trace_id, error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let row = state
        .store
        .create_user(NewUser {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
        })
        .await
        .map_err(|e| {
            match &e {
                StoreError::DuplicateEmail => {
                    tracing::info!(%trace_id, "signup with an email already in use")
                }
                other => tracing::error!(%trace_id, error = %other, "create user failed"),
            }
            AppError::from(e)
        })?;

    tracing::info!(%trace_id, user_id = row.id, "user created");
    Ok(Json(row.into()))
}

pub async fn login(
    Traced(trace_id): Traced,
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = json_body(&trace_id, payload)?;
    req.validate().map_err(AppError::invalid_request)?;

    let user = state
        .store
        .authenticate(req.email.trim(), &req.password)
        .await
        .map_err(|e| {
            match &e {
                StoreError::InvalidCredentials => {
                    tracing::info!(%trace_id, "login rejected: invalid credentials")
                }
                other => tracing::error!(%trace_id, error = %other, "authenticate failed"),
            }
            AppError::from(e)
        })?;

    let claims = state.auth.claims_for(user.id);
    let token = state.auth.issue_token(&claims).map_err(|e| {
        tracing::error!(%trace_id, error = %e, "token signing failed");
        AppError::from(e)
    })?;

    tracing::info!(%trace_id, user_id = user.id, "access token issued");
    Ok(Json(TokenResponse { token }))
}
