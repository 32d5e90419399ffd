use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{admin, auth, health, users, wallet};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/wallet", wallet::router())
        .nest("/api/admin", admin::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
