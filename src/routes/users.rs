use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::gate::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::{UserProfile, UserRequest};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/me", get(me).put(update_me).delete(delete_me))
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    info!("POST /api/users - Registering user");
    let profile = services::user_service::register(&state.pool, input)
        .await
        .map_err(|e| {
            error!("Registration failed: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, AppError> {
    info!("GET /api/users/me - Fetching profile");
    let profile =
        services::user_service::profile(&state.pool, state.ledger.as_ref(), &user.email).await?;
    Ok(Json(profile))
}

pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<UserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    info!("PUT /api/users/me - Updating profile");
    let current = services::user_service::resolve_subject(&state.pool, &user.email).await?;
    let profile =
        services::user_service::update(&state.pool, state.ledger.as_ref(), current, input)
            .await
            .map_err(|e| {
                error!("Profile update failed: {}", e);
                e
            })?;
    Ok(Json(profile))
}

pub async fn delete_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/users/me - Deleting account");
    let current = services::user_service::resolve_subject(&state.pool, &user.email).await?;
    services::user_service::delete(&state.pool, current.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
