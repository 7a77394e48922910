use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default bcrypt cost factor.
///
/// Matches the cost the account passwords were historically hashed with.
/// Hashes record their own cost, so raising this only affects new accounts.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Minimum accepted bcrypt cost.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Maximum accepted bcrypt cost (~800ms per hash at 14).
pub const MAX_BCRYPT_COST: u32 = 14;

/// Minimum length of the HS256 signing secret in bytes (RFC 7518 §3.2).
pub const MIN_JWT_SECRET_BYTES: usize = 32;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Process-wide session signing secret. Read-only after startup.
    pub jwt_secret: SecretString,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid bcrypt cost: {0}")]
    InvalidBcryptCost(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;
        let jwt_secret = SecretString::from(jwt_secret.as_str());

        let secret_len = jwt_secret.expose_secret().len();
        if secret_len < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES, secret_len
            )));
        }

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(raw) => parse_bcrypt_cost(raw)?,
            None => DEFAULT_BCRYPT_COST,
        };

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret,
            bcrypt_cost,
        })
    }
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, ConfigError> {
    let cost: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBcryptCost(format!("'{}' is not a number", raw)))?;

    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ConfigError::InvalidBcryptCost(format!(
            "{} is outside the allowed range {}-{}",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    Ok(cost)
}
