use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::Holding;

/// Per-user asset ledger. One implementation in production; the trait is the
/// seam that keeps valuation and wallet logic testable without a database.
#[async_trait]
pub trait HoldingsLedger: Send + Sync {
    /// Adds `delta` to the existing quantity for (owner, asset), creating the
    /// holding when absent. Must be atomic under concurrent calls.
    async fn upsert(&self, owner_id: Uuid, asset_id: &str, delta: f64) -> Result<Holding, AppError>;

    async fn list(&self, owner_id: Uuid) -> Result<Vec<Holding>, AppError>;

    /// Removes exactly one holding. Deleting a holding that does not exist is
    /// an error, not a no-op.
    async fn remove(&self, owner_id: Uuid, asset_id: &str) -> Result<(), AppError>;
}

pub struct PgHoldingsLedger {
    pool: PgPool,
}

impl PgHoldingsLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HoldingsLedger for PgHoldingsLedger {
    async fn upsert(&self, owner_id: Uuid, asset_id: &str, delta: f64) -> Result<Holding, AppError> {
        db::holding_queries::upsert_add(&self.pool, owner_id, asset_id, delta)
            .await
            .map_err(AppError::Db)
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<Holding>, AppError> {
        db::holding_queries::fetch_all(&self.pool, owner_id)
            .await
            .map_err(AppError::Db)
    }

    async fn remove(&self, owner_id: Uuid, asset_id: &str) -> Result<(), AppError> {
        match db::holding_queries::delete(&self.pool, owner_id, asset_id).await {
            Ok(0) => Err(AppError::HoldingNotFound),
            Ok(_) => Ok(()),
            Err(e) => Err(AppError::Db(e)),
        }
    }
}
