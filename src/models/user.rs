use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::holding::HoldingDto;

// A registered account. Roles are plain strings ("USER", "ADMIN") stored as a
// Postgres text[]; the password never leaves this struct unhashed.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// Registration and profile update share one request shape; which fields are
// mandatory is the service's call (all three on register, any subset on update).
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub holdings: Vec<HoldingDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub email: String,
    pub token: String,
}
