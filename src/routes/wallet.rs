use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::gate::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::{HoldingDto, HoldingRequest, ValuationReport};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(valuation).post(add_holding))
        .route("/:asset_id", delete(remove_holding))
}

pub async fn add_holding(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<HoldingRequest>,
) -> Result<(StatusCode, Json<HoldingDto>), AppError> {
    info!("POST /api/wallet - Adding holding");
    let owner = services::user_service::resolve_subject(&state.pool, &user.email).await?;
    let holding = services::wallet_service::add_asset(
        state.ledger.as_ref(),
        &state.price_cache,
        owner.id,
        input,
    )
    .await
    .map_err(|e| {
        error!("Failed to add holding: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(holding)))
}

pub async fn valuation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ValuationReport>, AppError> {
    info!("GET /api/wallet - Computing valuation");
    let owner = services::user_service::resolve_subject(&state.pool, &user.email).await?;
    let report = services::wallet_service::compute_valuation(
        state.ledger.as_ref(),
        &state.price_cache,
        &owner,
    )
    .await
    .map_err(|e| {
        error!("Valuation failed for {}: {}", owner.email, e);
        e
    })?;
    Ok(Json(report))
}

pub async fn remove_holding(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(asset_id): Path<String>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/wallet/{} - Removing holding", asset_id);
    let owner = services::user_service::resolve_subject(&state.pool, &user.email).await?;
    services::wallet_service::remove_asset(state.ledger.as_ref(), owner.id, &asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
