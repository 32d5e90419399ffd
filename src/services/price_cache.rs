use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::CacheConfig;
use crate::errors::AppError;
use crate::external::price_oracle::{PriceOracle, PriceOracleError};

/// A multi-currency spot price, valid until its age exceeds the cache TTL.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub asset_id: String,
    pub brl: f64,
    pub usd: f64,
    pub eur: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Shared price cache, keyed purely by asset id: prices are the same for
/// every caller. Stale entries are ignored and replaced on the next fetch.
/// Concurrent misses for the same key coalesce into one upstream request via
/// a per-key lock; waiters find the fresh entry when they get the lock.
pub struct PriceCache {
    oracle: Arc<dyn PriceOracle>,
    entries: DashMap<String, PriceQuote>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(oracle: Arc<dyn PriceOracle>, config: &CacheConfig) -> Self {
        Self {
            oracle,
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            ttl: Duration::seconds(config.ttl_secs),
        }
    }

    fn fresh(&self, asset_id: &str) -> Option<PriceQuote> {
        let entry = self.entries.get(asset_id)?;
        if Utc::now() - entry.fetched_at <= self.ttl {
            Some(entry.value().clone())
        } else {
            None
        }
    }

    pub async fn get_price(&self, asset_id: &str) -> Result<PriceQuote, AppError> {
        if let Some(quote) = self.fresh(asset_id) {
            return Ok(quote);
        }

        let lock = self
            .in_flight
            .entry(asset_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // A coalesced waiter: the fetch we queued behind already landed.
        if let Some(quote) = self.fresh(asset_id) {
            return Ok(quote);
        }

        let result = self.oracle.fetch_prices(asset_id).await;
        self.in_flight.remove(asset_id);

        match result {
            Ok(prices) => {
                info!("Fetched spot prices for {} from the oracle", asset_id);
                let quote = PriceQuote {
                    asset_id: asset_id.to_string(),
                    brl: prices.brl,
                    usd: prices.usd,
                    eur: prices.eur,
                    fetched_at: Utc::now(),
                };
                self.entries.insert(asset_id.to_string(), quote.clone());
                Ok(quote)
            }
            Err(PriceOracleError::AssetNotFound(id)) => Err(AppError::AssetNotFound(id)),
            Err(PriceOracleError::Unavailable(msg)) => Err(AppError::UpstreamUnavailable(msg)),
        }
    }
}
