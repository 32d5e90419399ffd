use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ledger::HoldingsLedger;
use crate::models::{AssetValuation, HoldingDto, HoldingRequest, User, ValuationReport};
use crate::services::price_cache::PriceCache;

/// One normalization rule for both the add and delete paths: surrounding
/// whitespace is trimmed before the asset id ever reaches the ledger.
fn normalize_asset_id(raw: &str) -> Result<String, AppError> {
    let asset_id = raw.trim();
    if asset_id.is_empty() {
        return Err(AppError::Validation("Asset id is required".to_string()));
    }
    Ok(asset_id.to_string())
}

/// Monetary rounding: 2 decimal places, half-up, applied to the decimal
/// rendering of the value after multiplication/summation.
fn round_2dp(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    BigDecimal::from_str(&value.to_string())
        .map(|d| d.with_scale_round(2, RoundingMode::HalfUp))
        .ok()
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Adds (or merges into) a holding. The price lookup doubles as an existence
/// check against the oracle and pre-warms the cache; its value is discarded.
pub async fn add_asset(
    ledger: &dyn HoldingsLedger,
    cache: &PriceCache,
    owner_id: Uuid,
    input: HoldingRequest,
) -> Result<HoldingDto, AppError> {
    let asset_id = normalize_asset_id(&input.asset_id)?;
    if !(input.quantity > 0.0) {
        return Err(AppError::Validation("Quantity must be greater than zero".to_string()));
    }

    cache.get_price(&asset_id).await?;

    let holding = ledger.upsert(owner_id, &asset_id, input.quantity).await?;
    info!("Upserted {} {} for user {}", holding.quantity, holding.asset_id, owner_id);
    Ok(holding.into())
}

pub async fn remove_asset(
    ledger: &dyn HoldingsLedger,
    owner_id: Uuid,
    asset_id: &str,
) -> Result<(), AppError> {
    let asset_id = normalize_asset_id(asset_id)?;
    ledger.remove(owner_id, &asset_id).await?;
    info!("Removed {} from user {}", asset_id, owner_id);
    Ok(())
}

/// Values the whole wallet in BRL, USD and EUR. An empty wallet returns zero
/// totals without touching the price cache; any asset the oracle cannot
/// price fails the whole valuation.
pub async fn compute_valuation(
    ledger: &dyn HoldingsLedger,
    cache: &PriceCache,
    user: &User,
) -> Result<ValuationReport, AppError> {
    let holdings = ledger.list(user.id).await?;

    let mut total_brl = 0.0;
    let mut total_usd = 0.0;
    let mut total_eur = 0.0;
    let mut assets = Vec::with_capacity(holdings.len());

    for holding in holdings {
        let quote = cache.get_price(&holding.asset_id).await?;

        let value_brl = quote.brl * holding.quantity;
        let value_usd = quote.usd * holding.quantity;
        let value_eur = quote.eur * holding.quantity;

        assets.push(AssetValuation {
            asset_id: holding.asset_id,
            quantity: holding.quantity,
            price_brl: round_2dp(quote.brl),
            value_brl: round_2dp(value_brl),
            price_usd: round_2dp(quote.usd),
            value_usd: round_2dp(value_usd),
            price_eur: round_2dp(quote.eur),
            value_eur: round_2dp(value_eur),
        });

        total_brl += value_brl;
        total_usd += value_usd;
        total_eur += value_eur;
    }

    Ok(ValuationReport {
        email: user.email.clone(),
        total_brl: round_2dp(total_brl),
        total_usd: round_2dp(total_usd),
        total_eur: round_2dp(total_eur),
        assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::external::price_oracle::{AssetPrices, PriceOracle, PriceOracleError};
    use crate::models::Holding;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MemoryLedger {
        rows: Mutex<Vec<Holding>>,
    }

    impl MemoryLedger {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HoldingsLedger for MemoryLedger {
        async fn upsert(
            &self,
            owner_id: Uuid,
            asset_id: &str,
            delta: f64,
        ) -> Result<Holding, AppError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows
                .iter_mut()
                .find(|h| h.owner_id == owner_id && h.asset_id == asset_id)
            {
                row.quantity += delta;
                return Ok(row.clone());
            }
            let holding = Holding {
                id: Uuid::new_v4(),
                owner_id,
                asset_id: asset_id.to_string(),
                quantity: delta,
                created_at: chrono::Utc::now(),
            };
            rows.push(holding.clone());
            Ok(holding)
        }

        async fn list(&self, owner_id: Uuid) -> Result<Vec<Holding>, AppError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|h| h.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn remove(&self, owner_id: Uuid, asset_id: &str) -> Result<(), AppError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|h| !(h.owner_id == owner_id && h.asset_id == asset_id));
            if rows.len() == before {
                return Err(AppError::HoldingNotFound);
            }
            Ok(())
        }
    }

    struct FixtureOracle {
        prices: HashMap<&'static str, AssetPrices>,
        calls: AtomicUsize,
    }

    impl FixtureOracle {
        fn new(prices: Vec<(&'static str, AssetPrices)>) -> Self {
            Self {
                prices: prices.into_iter().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceOracle for FixtureOracle {
        async fn fetch_prices(&self, asset_id: &str) -> Result<AssetPrices, PriceOracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(asset_id)
                .copied()
                .ok_or_else(|| PriceOracleError::AssetNotFound(asset_id.to_string()))
        }
    }

    fn price_fixture() -> Arc<FixtureOracle> {
        Arc::new(FixtureOracle::new(vec![
            (
                "bitcoin",
                AssetPrices {
                    brl: 350000.00,
                    usd: 65000.00,
                    eur: 60000.00,
                },
            ),
            (
                "ethereum",
                AssetPrices {
                    brl: 18000.50,
                    usd: 3500.10,
                    eur: 3000.00,
                },
            ),
        ]))
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            roles: vec!["USER".to_string()],
            created_at: chrono::Utc::now(),
        }
    }

    fn cache_over(oracle: Arc<FixtureOracle>) -> PriceCache {
        PriceCache::new(oracle, &CacheConfig { ttl_secs: 300 })
    }

    #[test]
    fn rounds_half_up_at_two_decimals() {
        assert_eq!(round_2dp(175000.004999), 175000.00);
        assert_eq!(round_2dp(175000.005), 175000.01);
        assert_eq!(round_2dp(2.675), 2.68);
        assert_eq!(round_2dp(0.0), 0.0);
    }

    #[test]
    fn rounding_treats_non_finite_as_zero() {
        assert_eq!(round_2dp(f64::NAN), 0.0);
        assert_eq!(round_2dp(f64::INFINITY), 0.0);
    }

    #[tokio::test]
    async fn empty_wallet_values_to_zero_without_oracle_traffic() {
        let ledger = MemoryLedger::new();
        let oracle = price_fixture();
        let cache = cache_over(oracle.clone());

        let report = compute_valuation(&ledger, &cache, &test_user()).await.unwrap();

        assert_eq!(report.total_brl, 0.0);
        assert_eq!(report.total_usd, 0.0);
        assert_eq!(report.total_eur, 0.0);
        assert!(report.assets.is_empty());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn values_bitcoin_and_ethereum_wallet() {
        let ledger = MemoryLedger::new();
        let oracle = price_fixture();
        let cache = cache_over(oracle.clone());
        let user = test_user();

        ledger.upsert(user.id, "bitcoin", 0.5).await.unwrap();
        ledger.upsert(user.id, "ethereum", 10.0).await.unwrap();

        let report = compute_valuation(&ledger, &cache, &user).await.unwrap();

        assert_eq!(report.total_brl, 355005.00);
        assert_eq!(report.total_usd, 67501.00);
        assert_eq!(report.total_eur, 60000.00);

        let bitcoin = &report.assets[0];
        assert_eq!(bitcoin.asset_id, "bitcoin");
        assert_eq!(bitcoin.value_brl, 175000.00);
        assert_eq!(bitcoin.value_usd, 32500.00);
        assert_eq!(bitcoin.value_eur, 30000.00);
    }

    #[tokio::test]
    async fn unpriceable_holding_fails_the_whole_valuation() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());
        let user = test_user();

        ledger.upsert(user.id, "bitcoin", 0.5).await.unwrap();
        ledger.upsert(user.id, "delisted-coin", 1.0).await.unwrap();

        let err = compute_valuation(&ledger, &cache, &user).await.unwrap_err();
        assert!(matches!(err, AppError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn repeated_adds_merge_additively() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());
        let owner = Uuid::new_v4();

        add_asset(
            &ledger,
            &cache,
            owner,
            HoldingRequest {
                asset_id: "bitcoin".to_string(),
                quantity: 0.3,
            },
        )
        .await
        .unwrap();
        let merged = add_asset(
            &ledger,
            &cache,
            owner,
            HoldingRequest {
                asset_id: "bitcoin".to_string(),
                quantity: 0.2,
            },
        )
        .await
        .unwrap();

        assert_eq!(merged.quantity, 0.5);
        assert_eq!(ledger.list(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_and_delete_share_one_normalization_rule() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());
        let owner = Uuid::new_v4();

        add_asset(
            &ledger,
            &cache,
            owner,
            HoldingRequest {
                asset_id: "  bitcoin  ".to_string(),
                quantity: 1.0,
            },
        )
        .await
        .unwrap();

        remove_asset(&ledger, owner, "bitcoin ").await.unwrap();
        assert!(ledger.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_asset_is_rejected_before_the_ledger() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());
        let owner = Uuid::new_v4();

        let err = add_asset(
            &ledger,
            &cache,
            owner,
            HoldingRequest {
                asset_id: "no-such-coin".to_string(),
                quantity: 1.0,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::AssetNotFound(_)));
        assert!(ledger.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());

        for quantity in [0.0, -1.0, f64::NAN] {
            let err = add_asset(
                &ledger,
                &cache,
                Uuid::new_v4(),
                HoldingRequest {
                    asset_id: "bitcoin".to_string(),
                    quantity,
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn deleting_a_missing_holding_fails_and_touches_nothing() {
        let ledger = MemoryLedger::new();
        let cache = cache_over(price_fixture());
        let owner = Uuid::new_v4();

        add_asset(
            &ledger,
            &cache,
            owner,
            HoldingRequest {
                asset_id: "ethereum".to_string(),
                quantity: 2.0,
            },
        )
        .await
        .unwrap();

        let err = remove_asset(&ledger, owner, "bitcoin").await.unwrap_err();
        assert!(matches!(err, AppError::HoldingNotFound));

        let remaining = ledger.list(owner).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].asset_id, "ethereum");
        assert_eq!(remaining[0].quantity, 2.0);
    }
}
