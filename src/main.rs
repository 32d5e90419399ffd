use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use coinfolio_backend::app;
use coinfolio_backend::auth::token::TokenIssuer;
use coinfolio_backend::config::{CacheConfig, SecurityConfig};
use coinfolio_backend::external::coingecko::CoinGeckoOracle;
use coinfolio_backend::ledger::{HoldingsLedger, PgHoldingsLedger};
use coinfolio_backend::logging::{init_logging, LoggingConfig};
use coinfolio_backend::services::price_cache::PriceCache;
use coinfolio_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())?;

    // A broken signing key configuration is fatal here, never per-request.
    let security = SecurityConfig::from_env()
        .expect("Invalid security configuration (check JWT_SECRET / JWT_TTL_MINUTES)");
    let token_issuer =
        Arc::new(TokenIssuer::new(&security).expect("Failed to construct token issuer"));

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let oracle = Arc::new(
        CoinGeckoOracle::from_env().expect("Failed to construct CoinGecko client"),
    );
    let price_cache = Arc::new(PriceCache::new(oracle, &CacheConfig::from_env()));
    let ledger: Arc<dyn HoldingsLedger> = Arc::new(PgHoldingsLedger::new(pool.clone()));

    let state = AppState {
        pool,
        ledger,
        price_cache,
        token_issuer,
    };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Coinfolio backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
