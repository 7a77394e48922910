use crate::errors::AccountError;
use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Exclusive upper bound for business account numbers: `[0, 10^15)`.
pub const ACCOUNT_NUMBER_RANGE: u64 = 1_000_000_000_000_000;

/// Account model (maps to accounts table)
///
/// `password_hash` is skipped on serialization and redacted from `Debug`, so
/// no outward representation of an account carries password material.
#[derive(Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "accountNumber")]
    pub number: i64,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("number", &self.number)
            .field("password_hash", &"[REDACTED]")
            .field("balance", &self.balance)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Account that has not been persisted yet (no surrogate key).
#[derive(Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub password_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a new account with a freshly generated business number.
    pub fn new(
        first_name: &str,
        last_name: &str,
        password_hash: String,
    ) -> Result<Self, AccountError> {
        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            number: generate_account_number()?,
            password_hash,
            balance: 0,
            created_at: Utc::now(),
        })
    }

    /// Attach the store-assigned surrogate key.
    pub fn into_account(self, id: i32) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            password_hash: self.password_hash,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("number", &self.number)
            .field("password_hash", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Draw a uniformly distributed account number in `[0, 10^15)`.
///
/// Rejection sampling over the CSPRNG output avoids modulo bias.
pub fn generate_account_number() -> Result<i64, AccountError> {
    let rng = SystemRandom::new();
    let zone = u64::MAX - (u64::MAX % ACCOUNT_NUMBER_RANGE);

    loop {
        let mut bytes = [0u8; 8];
        rng.fill(&mut bytes)
            .map_err(|e| AccountError::Crypto(format!("Random number generation failed: {}", e)))?;

        let candidate = u64::from_le_bytes(bytes);
        if candidate < zone {
            let number = candidate % ACCOUNT_NUMBER_RANGE;
            return i64::try_from(number).map_err(|_| AccountError::Internal);
        }
    }
}

/// Whether `number` lies in the business account number range.
pub fn is_valid_account_number(number: i64) -> bool {
    u64::try_from(number).is_ok_and(|n| n < ACCOUNT_NUMBER_RANGE)
}

/// POST /create body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
}

/// POST /login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "accountNumber")]
    pub number: i64,
    pub password: SecretString,
}

/// POST /login response; echoes the login request minus the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(rename = "accountNumber")]
    pub number: i64,
    pub token_type: String,
    pub expires_in: u64,
}

/// POST /transfer body, echoed back unchanged on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "toAccount")]
    pub to_account: i64,
    pub amount: i64,
}

/// DELETE /accounts/{id}/delete response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: i32,
}

/// GET /ready response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
}
