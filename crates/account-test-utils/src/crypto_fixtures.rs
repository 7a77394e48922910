//! Deterministic secrets for testing
//!
//! Each secret meets the 32-byte minimum enforced by `Config`.

use account_service::config::{Config, ConfigError, MIN_BCRYPT_COST};
use secrecy::SecretString;
use std::collections::HashMap;

/// Secret the test server signs session tokens with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-do-not-use-in-production";

/// A different secret; tokens signed with it must be rejected.
pub const FOREIGN_JWT_SECRET: &str = "foreign-jwt-secret-never-trusted-by-server";

pub fn test_jwt_secret() -> SecretString {
    SecretString::from(TEST_JWT_SECRET)
}

/// Configuration for the test server.
///
/// Uses the cheapest allowed bcrypt cost to keep tests fast.
pub fn test_config() -> Result<Config, ConfigError> {
    let vars = HashMap::from([
        (
            "DATABASE_URL".to_string(),
            "postgresql://localhost/account_test".to_string(),
        ),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("BCRYPT_COST".to_string(), MIN_BCRYPT_COST.to_string()),
    ]);
    Config::from_vars(&vars)
}
