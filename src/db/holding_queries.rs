use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Holding;

/// Additive merge: concurrent upserts for the same (owner, asset) pair are
/// serialized by Postgres inside the ON CONFLICT clause, so no delta is lost.
pub async fn upsert_add(
    pool: &PgPool,
    owner_id: Uuid,
    asset_id: &str,
    delta: f64,
) -> Result<Holding, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "INSERT INTO holdings (id, owner_id, asset_id, quantity)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (owner_id, asset_id)
         DO UPDATE SET quantity = holdings.quantity + EXCLUDED.quantity
         RETURNING id, owner_id, asset_id, quantity, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(asset_id)
    .bind(delta)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Holding>, sqlx::Error> {
    sqlx::query_as::<_, Holding>(
        "SELECT id, owner_id, asset_id, quantity, created_at
         FROM holdings
         WHERE owner_id = $1
         ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, owner_id: Uuid, asset_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM holdings WHERE owner_id = $1 AND asset_id = $2")
        .bind(owner_id)
        .bind(asset_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
