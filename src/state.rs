use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::token::TokenIssuer;
use crate::ledger::HoldingsLedger;
use crate::services::price_cache::PriceCache;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ledger: Arc<dyn HoldingsLedger>,
    pub price_cache: Arc<PriceCache>,
    pub token_issuer: Arc<TokenIssuer>,
}
