use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

// Spot prices for one asset in the three quote currencies. A currency the
// oracle omits deserializes as 0.0 rather than failing the whole quote.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AssetPrices {
    #[serde(default)]
    pub brl: f64,
    #[serde(default)]
    pub usd: f64,
    #[serde(default)]
    pub eur: f64,
}

#[derive(Debug, Error)]
pub enum PriceOracleError {
    #[error("unknown asset: {0}")]
    AssetNotFound(String),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetches the current BRL/USD/EUR spot prices for one asset id.
    /// A single attempt; retries, if any, are the caller's business.
    async fn fetch_prices(&self, asset_id: &str) -> Result<AssetPrices, PriceOracleError>;
}
