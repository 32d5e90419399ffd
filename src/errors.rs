use axum::http::StatusCode;
use axum::response::IntoResponse;
use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User not found")]
    UserNotFound,
    #[error("Holding not found")]
    HoldingNotFound,
    #[error("Unknown asset: {0}")]
    AssetNotFound(String),
    #[error("Price oracle unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Authentication failure")]
    AuthenticationFailure,
    #[error("Forbidden")]
    AuthorizationDenied,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::DuplicateEmail => (StatusCode::CONFLICT, "Email already registered").into_response(),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found").into_response(),
            AppError::HoldingNotFound => (StatusCode::NOT_FOUND, "Holding not found").into_response(),
            AppError::AssetNotFound(asset) => {
                (StatusCode::NOT_FOUND, format!("Unknown asset: {}", asset)).into_response()
            }
            AppError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::AuthenticationFailure => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AppError::AuthorizationDenied => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            AppError::Db(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: Error) -> Self {
        AppError::Db(value)
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
