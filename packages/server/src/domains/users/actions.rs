//! Registration, login, and token refresh.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use super::jwt::{JwtService, TokenPair};
use super::models::User;
use super::password::{hash_password, validate_password_strength, verify_password};
use super::queries;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    WeakPassword(String),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub auto_response_enabled: bool,
    #[serde(default = "default_auto_response_delay")]
    pub auto_response_delay: i32,
}

fn default_auto_response_delay() -> i32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Register a new user and issue an initial token pair.
pub async fn register(
    pool: &PgPool,
    jwt: &JwtService,
    input: RegisterInput,
) -> Result<(User, TokenPair), AuthError> {
    if input.password != input.password_confirm {
        return Err(AuthError::PasswordMismatch);
    }
    validate_password_strength(&input.password)?;

    if input.auto_response_delay < 0 {
        return Err(AuthError::Validation(
            "auto_response_delay must be non-negative".to_string(),
        ));
    }

    // The unique constraints still back these checks; a race surfaces as an
    // insert error rather than a duplicate row.
    if queries::username_exists(pool, &input.username).await? {
        return Err(AuthError::UsernameTaken);
    }
    if queries::email_exists(pool, &input.email).await? {
        return Err(AuthError::EmailTaken);
    }

    let password_hash = hash_password(&input.password)?;
    let user = queries::insert_user(
        pool,
        queries::NewUser {
            username: &input.username,
            email: &input.email,
            password_hash: &password_hash,
            first_name: &input.first_name,
            last_name: &input.last_name,
            auto_response_enabled: input.auto_response_enabled,
            auto_response_delay: input.auto_response_delay,
        },
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "registered new user");

    let tokens = jwt.create_token_pair(user.id, &user.username)?;
    Ok((user, tokens))
}

/// Verify credentials and issue a fresh token pair.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtService,
    input: LoginInput,
) -> Result<(User, TokenPair), AuthError> {
    let Some(user) = queries::find_by_username(pool, &input.username).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    // Deactivated accounts look the same as bad credentials from outside
    if !user.is_active {
        return Err(AuthError::InvalidCredentials);
    }

    let tokens = jwt.create_token_pair(user.id, &user.username)?;
    Ok((user, tokens))
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(jwt: &JwtService, refresh_token: &str) -> Result<String, AuthError> {
    let claims = jwt
        .verify_refresh_token(refresh_token)
        .map_err(|_| AuthError::InvalidToken)?;

    jwt.create_access_token(claims.user_id.into(), &claims.username)
        .map_err(AuthError::Internal)
}
