use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A quantity of one asset owned by one user. One row per (owner_id, asset_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holding {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub asset_id: String,
    pub quantity: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingRequest {
    pub asset_id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingDto {
    pub asset_id: String,
    pub quantity: f64,
}

impl From<Holding> for HoldingDto {
    fn from(h: Holding) -> Self {
        Self {
            asset_id: h.asset_id,
            quantity: h.quantity,
        }
    }
}
