//! Session token issuance and verification.
//!
//! The signing secret is injected once at construction and never re-read
//! from the environment. Keys are immutable afterwards, so a single
//! `SessionTokens` can be shared across request tasks without locking.

use crate::crypto::{self, SessionClaims};
use crate::errors::{AccountError, TokenError};
use crate::models::Account;
use crate::observability::metrics::{record_token_issuance, record_token_validation};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::instrument;

/// Session lifetime: 15 minutes.
pub const TOKEN_EXPIRY_SECONDS: i64 = 15 * 60;

/// Token scheme used in the `Authorization` header.
pub const TOKEN_TYPE: &str = "Bearer";

/// A freshly signed session token.
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl IssuedToken {
    /// `Authorization` header value for this token.
    pub fn bearer_header(&self) -> String {
        format!("{} {}", TOKEN_TYPE, self.token)
    }
}

/// Issues and verifies HS256 session tokens bound to an account number.
///
/// A token only asserts which account the bearer authenticated as. What the
/// bearer may do is decided by the access gate.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl SessionTokens {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for `account`, expiring 15 minutes from now.
    #[instrument(skip_all)]
    pub fn issue(&self, account: &Account) -> Result<IssuedToken, AccountError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            account_number: account.number,
            exp: now + TOKEN_EXPIRY_SECONDS,
            iat: now,
        };

        match crypto::sign_session_jwt(&claims, &self.encoding_key) {
            Ok(token) => {
                record_token_issuance("success");
                Ok(IssuedToken {
                    token,
                    expires_in: TOKEN_EXPIRY_SECONDS.unsigned_abs(),
                })
            }
            Err(e) => {
                record_token_issuance("error");
                Err(e)
            }
        }
    }

    /// Verify a raw token (scheme already stripped) against the current time.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a raw token against an explicit clock reading.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, TokenError> {
        match crypto::verify_session_jwt(token, &self.decoding_key, now) {
            Ok(claims) => {
                record_token_validation("success", None);
                Ok(claims)
            }
            Err(e) => {
                record_token_validation("error", Some(e.as_str()));
                Err(e)
            }
        }
    }
}
