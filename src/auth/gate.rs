use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::state::AppState;

pub const USER_ROLE: &str = "USER";
pub const ADMIN_ROLE: &str = "ADMIN";

/// The verified output of the gate: subject and roles taken verbatim from the
/// credential. Storage is not consulted to refresh roles.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Pure set-membership check. Missing the role is Forbidden; a missing
/// identity never reaches this point (that is a 401 upstream).
pub fn authorize(identity: &AuthenticatedUser, required_role: &str) -> Result<(), AppError> {
    if identity.has_role(required_role) {
        Ok(())
    } else {
        Err(AppError::AuthorizationDenied)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        // The whole header value is the credential; no "Bearer " prefix.
        let raw = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::AuthenticationFailure)?;

        let claims = state.token_issuer.verify(raw)?;
        Ok(Self {
            email: claims.sub,
            roles: claims.roles,
        })
    }
}

/// Extractor for the admin route tier: a valid credential that also carries
/// the ADMIN role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        authorize(&user, ADMIN_ROLE)?;
        Ok(Self(user))
    }
}
