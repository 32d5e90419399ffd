use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::gate::USER_ROLE;
use crate::auth::password;
use crate::auth::token::TokenIssuer;
use crate::db;
use crate::errors::AppError;
use crate::ledger::HoldingsLedger;
use crate::models::{LoginRequest, Session, User, UserProfile, UserRequest};

fn required(value: Option<&String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

fn profile_of(user: User, holdings: Vec<crate::models::Holding>) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        holdings: holdings.into_iter().map(Into::into).collect(),
    }
}

pub async fn register(pool: &PgPool, input: UserRequest) -> Result<UserProfile, AppError> {
    let email = required(input.email.as_ref(), "Email is required")?;
    let name = required(input.name.as_ref(), "Name is required")?;
    let password = required(input.password.as_ref(), "Password is required")?;

    if db::user_queries::exists_by_email(pool, &email).await? {
        return Err(AppError::DuplicateEmail);
    }

    let hash = password::hash_password(&password)?;
    let roles = vec![USER_ROLE.to_string()];
    let user = db::user_queries::insert(pool, &name, &email, &hash, &roles).await?;
    info!("Registered user {}", user.email);

    Ok(profile_of(user, Vec::new()))
}

pub async fn login(
    pool: &PgPool,
    issuer: &TokenIssuer,
    input: LoginRequest,
) -> Result<Session, AppError> {
    let user = db::user_queries::fetch_by_email(pool, &input.email)
        .await?
        .ok_or(AppError::AuthenticationFailure)?;

    if !password::verify_password(&user.password_hash, &input.password) {
        return Err(AppError::AuthenticationFailure);
    }

    let token = issuer.issue(&user.email, &user.roles)?;
    info!("Issued session token for {}", user.email);

    Ok(Session {
        email: user.email,
        token,
    })
}

/// Resolves the token subject back to a stored user. The subject of a valid
/// credential whose account has since been deleted gets a 401, not a 404.
pub async fn resolve_subject(pool: &PgPool, email: &str) -> Result<User, AppError> {
    db::user_queries::fetch_by_email(pool, email)
        .await?
        .ok_or(AppError::AuthenticationFailure)
}

pub async fn fetch_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    db::user_queries::fetch_by_id(pool, id)
        .await?
        .ok_or(AppError::UserNotFound)
}

pub async fn profile(
    pool: &PgPool,
    ledger: &dyn HoldingsLedger,
    email: &str,
) -> Result<UserProfile, AppError> {
    let user = resolve_subject(pool, email).await?;
    let holdings = ledger.list(user.id).await?;
    Ok(profile_of(user, holdings))
}

/// Partial update: only non-blank fields change. An email change re-checks
/// uniqueness; a password change re-hashes.
pub async fn update(
    pool: &PgPool,
    ledger: &dyn HoldingsLedger,
    user: User,
    input: UserRequest,
) -> Result<UserProfile, AppError> {
    let mut name = user.name.clone();
    let mut email = user.email.clone();
    let mut password_hash = user.password_hash.clone();

    if let Some(new_name) = input.name.as_ref().filter(|v| !v.trim().is_empty()) {
        name = new_name.clone();
    }
    if let Some(new_email) = input.email.as_ref().filter(|v| !v.trim().is_empty()) {
        if *new_email != user.email {
            if db::user_queries::exists_by_email(pool, new_email).await? {
                return Err(AppError::DuplicateEmail);
            }
            email = new_email.clone();
        }
    }
    if let Some(new_password) = input.password.as_ref().filter(|v| !v.trim().is_empty()) {
        password_hash = password::hash_password(new_password)?;
    }

    let updated = db::user_queries::update(pool, user.id, &name, &email, &password_hash)
        .await?
        .ok_or(AppError::UserNotFound)?;
    let holdings = ledger.list(updated.id).await?;

    Ok(profile_of(updated, holdings))
}

/// Deletes the account and all of its holdings in one atomic operation.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    match db::user_queries::delete_cascade(pool, id).await? {
        0 => Err(AppError::UserNotFound),
        _ => {
            info!("Deleted user {}", id);
            Ok(())
        }
    }
}

pub async fn list_all(
    pool: &PgPool,
    ledger: &dyn HoldingsLedger,
) -> Result<Vec<UserProfile>, AppError> {
    let users = db::user_queries::fetch_all(pool).await?;
    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        let holdings = ledger.list(user.id).await?;
        profiles.push(profile_of(user, holdings));
    }
    Ok(profiles)
}
