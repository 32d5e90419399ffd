use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::gate::AdminUser;
use crate::errors::AppError;
use crate::models::{UserProfile, UserRequest};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/users/:id/wallet/:asset_id", delete(delete_user_holding))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    info!("GET /api/admin/users - Listing users");
    let profiles = services::user_service::list_all(&state.pool, state.ledger.as_ref()).await?;
    Ok(Json(profiles))
}

pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    info!("GET /api/admin/users/{} - Fetching user", id);
    let user = services::user_service::fetch_by_id(&state.pool, id).await?;
    let profile =
        services::user_service::profile(&state.pool, state.ledger.as_ref(), &user.email).await?;
    Ok(Json(profile))
}

pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    info!("PUT /api/admin/users/{} - Updating user", id);
    let user = services::user_service::fetch_by_id(&state.pool, id).await?;
    let profile = services::user_service::update(&state.pool, state.ledger.as_ref(), user, input)
        .await
        .map_err(|e| {
            error!("Admin update of user {} failed: {}", id, e);
            e
        })?;
    Ok(Json(profile))
}

pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/admin/users/{} - Deleting user", id);
    services::user_service::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user_holding(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, asset_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/admin/users/{}/wallet/{} - Removing holding", id, asset_id);
    let user = services::user_service::fetch_by_id(&state.pool, id).await?;
    services::wallet_service::remove_asset(state.ledger.as_ref(), user.id, &asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
