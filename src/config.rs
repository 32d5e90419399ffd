/// Per-concern configuration loaded from the environment: each collaborator
/// gets a `from_env` constructor, and anything that makes the service
/// unusable (a missing signing key) fails here, at startup.

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET is not set".to_string())?;
        let token_ttl_minutes = std::env::var("JWT_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| "JWT_TTL_MINUTES must be an integer".to_string())?;

        let config = Self { jwt_secret, token_ttl_minutes };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        if self.token_ttl_minutes <= 0 {
            return Err("JWT_TTL_MINUTES must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OracleConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("COINGECKO_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
            timeout_secs: std::env::var("ORACLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_secs: i64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            ttl_secs: std::env::var("PRICE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}
