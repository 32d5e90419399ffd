pub mod price_cache;
pub mod user_service;
pub mod wallet_service;
