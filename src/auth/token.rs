use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens. Stateless: verification is a
/// signature + expiry check, never a lookup. The signing key is shared with
/// nothing else and lives for the process lifetime.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Fails only on bad configuration, which callers treat as fatal at startup.
    pub fn new(config: &SecurityConfig) -> Result<Self, String> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            lifetime: Duration::minutes(config.token_ttl_minutes),
        })
    }

    pub fn issue(&self, email: &str, roles: &[String]) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            roles: roles.to_vec(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Decode failure, signature mismatch and expiry all collapse into a
    /// single AuthenticationFailure; the caller learns nothing more.
    pub fn verify(&self, raw: &str) -> Result<Claims, AppError> {
        decode::<Claims>(raw, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::AuthenticationFailure)
    }
}
