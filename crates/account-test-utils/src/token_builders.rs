//! Builder for hand-made session tokens
//!
//! Lets tests produce tokens the server would never issue: expired, signed
//! with another secret, or bound to an arbitrary account number.

use crate::crypto_fixtures::TEST_JWT_SECRET;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for test session tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_account(alice.number)
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    account: i64,
    exp: i64,
    iat: i64,
    secret: String,
}

impl TestTokenBuilder {
    /// Defaults: account 0, 15 minute lifetime, the test server's secret.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            account: 0,
            exp: (now + Duration::seconds(900)).timestamp(),
            iat: now.timestamp(),
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    /// Set the account number claim
    pub fn for_account(mut self, number: i64) -> Self {
        self.account = number;
        self
    }

    /// Set expiration in seconds from now (negative for already expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set expiration to an absolute timestamp
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.exp = timestamp;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Sign with a different secret
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build the claims as a JSON value
    pub fn build_claims(&self) -> serde_json::Value {
        json!({
            "account": self.account,
            "exp": self.exp,
            "iat": self.iat,
        })
    }

    /// Sign the claims with HS256
    pub fn sign(self) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &self.build_claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("HS256 signing of test claims")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
