use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{LoginRequest, Session};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    info!("POST /api/auth/login - Login attempt");
    let session = services::user_service::login(&state.pool, &state.token_issuer, input)
        .await
        .map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;
    Ok(Json(session))
}
