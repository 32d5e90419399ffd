use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::OracleConfig;
use crate::external::price_oracle::{AssetPrices, PriceOracle, PriceOracleError};

/// CoinGecko `simple/price` client. The response is a JSON object keyed by
/// asset id: { "bitcoin": { "brl": 350000.0, "usd": 65000.0, "eur": 60000.0 } }.
/// An unknown id yields an empty object, which we surface as AssetNotFound.
pub struct CoinGeckoOracle {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoOracle {
    pub fn new(config: &OracleConfig) -> Result<Self, PriceOracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PriceOracleError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, PriceOracleError> {
        Self::new(&OracleConfig::from_env())
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn fetch_prices(&self, asset_id: &str) -> Result<AssetPrices, PriceOracleError> {
        let url = format!("{}/simple/price", self.base_url);
        debug!("Fetching spot prices for {} from {}", asset_id, url);

        let resp = self
            .client
            .get(&url)
            .query(&[("ids", asset_id), ("vs_currencies", "brl,usd,eur")])
            .send()
            .await
            .map_err(|e| PriceOracleError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceOracleError::Unavailable(format!(
                "oracle returned HTTP {}",
                resp.status()
            )));
        }

        let mut body: HashMap<String, AssetPrices> = resp
            .json()
            .await
            .map_err(|e| PriceOracleError::Unavailable(e.to_string()))?;

        body.remove(asset_id)
            .ok_or_else(|| PriceOracleError::AssetNotFound(asset_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oracle_for(server: &MockServer) -> CoinGeckoOracle {
        CoinGeckoOracle::new(&OracleConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn parses_nested_price_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin"))
            .and(query_param("vs_currencies", "brl,usd,eur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bitcoin": { "brl": 350000.0, "usd": 65000.0, "eur": 60000.0 }
            })))
            .mount(&server)
            .await;

        let prices = oracle_for(&server).fetch_prices("bitcoin").await.unwrap();
        assert_eq!(prices.brl, 350000.0);
        assert_eq!(prices.usd, 65000.0);
        assert_eq!(prices.eur, 60000.0);
    }

    #[tokio::test]
    async fn unknown_asset_yields_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let err = oracle_for(&server)
            .fetch_prices("no-such-coin")
            .await
            .unwrap_err();
        assert!(matches!(err, PriceOracleError::AssetNotFound(id) if id == "no-such-coin"));
    }

    #[tokio::test]
    async fn http_error_yields_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = oracle_for(&server).fetch_prices("bitcoin").await.unwrap_err();
        assert!(matches!(err, PriceOracleError::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_currency_defaults_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bitcoin": { "brl": 350000.0, "usd": 65000.0 }
            })))
            .mount(&server)
            .await;

        let prices = oracle_for(&server).fetch_prices("bitcoin").await.unwrap();
        assert_eq!(prices.eur, 0.0);
    }
}
