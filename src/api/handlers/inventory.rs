/*
 * Responsibility
 * - /inventory handlers; the owner always comes from verified claims, never the body
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    api::dto::inventory::{CreateInventoryRequest, InventoryListResponse, InventoryResponse},
    api::extractors::Authenticated,
    error::AppError,
    state::AppState,
};

use super::json_body;

pub async fn add_inventory(
    Authenticated { trace_id, claims }: Authenticated,
    State(state): State<AppState>,
    payload: Result<Json<CreateInventoryRequest>, JsonRejection>,
) -> Result<Json<InventoryResponse>, AppError> {
    let owner = claims.user_id().ok_or(AppError::Unauthorized)?;

    let req = json_body(&trace_id, payload)?;
    req.validate().map_err(AppError::invalid_request)?;

    let row = state
        .store
        .create_inventory(req.into_new_inventory(), owner)
        .await
        .map_err(|e| {
            tracing::error!(%trace_id, error = %e, "create inventory failed");
            AppError::from(e)
        })?;

    tracing::info!(%trace_id, user_id = owner, item_id = row.id, "inventory item added");
    Ok(Json(row.into()))
}

pub async fn view_inventory(
    Authenticated { trace_id, claims }: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<InventoryListResponse>, AppError> {
    let owner = claims.user_id().ok_or(AppError::Unauthorized)?;

    let view = state.store.view_inventory(owner).await.map_err(|e| {
        tracing::error!(%trace_id, error = %e, "list inventory failed");
        AppError::from(e)
    })?;

    tracing::debug!(%trace_id, user_id = owner, items = view.items.len(), "inventory listed");
    Ok(Json(view.into()))
}
