use anyhow::{bail, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::UserId;

const ACCESS_TOKEN_HOURS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 7;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,        // Subject (user_id as string)
    pub user_id: Uuid,      // User UUID
    pub username: String,   // Username (for logging/debugging)
    pub token_type: String, // "access" or "refresh"
    pub exp: i64,           // Expiration timestamp
    pub iat: i64,           // Issued at timestamp
    pub iss: String,        // Issuer
    pub jti: String,        // JWT ID (unique token identifier)
}

/// Access/refresh token pair returned on registration and login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create an access token for a user
    ///
    /// Token expires after 1 hour
    pub fn create_access_token(&self, user_id: UserId, username: &str) -> Result<String> {
        self.create_token(user_id, username, "access", chrono::Duration::hours(ACCESS_TOKEN_HOURS))
    }

    /// Create a refresh token for a user
    ///
    /// Token expires after 7 days
    pub fn create_refresh_token(&self, user_id: UserId, username: &str) -> Result<String> {
        self.create_token(user_id, username, "refresh", chrono::Duration::days(REFRESH_TOKEN_DAYS))
    }

    /// Create an access/refresh pair for a user
    pub fn create_token_pair(&self, user_id: UserId, username: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.create_access_token(user_id, username)?,
            refresh: self.create_refresh_token(user_id, username)?,
        })
    }

    fn create_token(
        &self,
        user_id: UserId,
        username: &str,
        token_type: &str,
        ttl: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            user_id: user_id.into_uuid(),
            username: username.to_string(),
            token_type: token_type.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }

    /// Verify an access token, rejecting refresh tokens
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != "access" {
            bail!("expected access token, got {}", claims.token_type);
        }
        Ok(claims)
    }

    /// Verify a refresh token, rejecting access tokens
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != "refresh" {
            bail!("expected refresh token, got {}", claims.token_type);
        }
        Ok(claims)
    }
}
