//! Authentication service implementation
//!
//! This service hashes and verifies passwords, issues HS256 bearer tokens and
//! resolves the current user from a presented token.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthConfig;
use crate::database::UserRepository;
use crate::models::user::{TokenResponse, User};
use crate::utils::errors::{GatherError, Result};
use crate::utils::helpers::normalize_email;
use crate::utils::logging::log_auth_event;

/// Lifetime used when a token is created without one
const FALLBACK_TOKEN_MINUTES: i64 = 15;

const BAD_CREDENTIALS: &str = "Incorrect username or password";
const BAD_TOKEN: &str = "Could not validate credentials";

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Email of the token owner
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        let secret = config.secret_key.as_bytes();
        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime: Duration::minutes(config.access_token_expire_minutes),
        }
    }

    /// Hash a password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| GatherError::PasswordHash(e.to_string()))
    }

    /// Check a password against a stored hash; a malformed hash never verifies
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                debug!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Sign a token for `subject`, valid for `lifetime` (15 minutes when `None`)
    pub fn create_access_token(&self, subject: &str, lifetime: Option<Duration>) -> Result<String> {
        let now = Utc::now();
        let expires = now + lifetime.unwrap_or_else(|| Duration::minutes(FALLBACK_TOKEN_MINUTES));
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry, returning the claims
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    /// Look up a user by email and check the password
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let user = self.users.find_by_email(&email).await?;

        match user {
            Some(user) if self.verify_password(password, &user.password_hash) => {
                log_auth_event(&email, "login", true);
                Ok(user)
            }
            _ => {
                log_auth_event(&email, "login", false);
                Err(GatherError::Authentication(BAD_CREDENTIALS.to_string()))
            }
        }
    }

    /// Token response for a user, using the configured lifetime
    pub fn issue_token(&self, user: &User) -> Result<TokenResponse> {
        let access_token = self.create_access_token(&user.email, Some(self.token_lifetime))?;
        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            user_id: user.id,
            email: user.email.clone(),
        })
    }

    /// Resolve the user a bearer token was issued to
    pub async fn resolve_current_user(&self, token: &str) -> Result<User> {
        let claims = self.decode_token(token).map_err(|e| {
            log_auth_event("<token>", "resolve", false);
            debug!(error = %e, "Rejected bearer token");
            GatherError::Authentication(BAD_TOKEN.to_string())
        })?;

        match self.users.find_by_email(&claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                log_auth_event(&claims.sub, "resolve", false);
                Err(GatherError::Authentication(BAD_TOKEN.to_string()))
            }
        }
    }
}
