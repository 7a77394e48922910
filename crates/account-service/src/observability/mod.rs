//! Observability module for the account service
//!
//! # Privacy by Default
//!
//! Instrumented functions use `#[instrument(skip_all)]` and log only
//! allow-listed fields. Fields fall into three categories:
//! - **SAFE**: plaintext (surrogate ids, outcomes, error categories)
//! - **HASHED**: SHA-256 prefix for correlation (account numbers)
//! - **NEVER**: passwords, password hashes, tokens, the signing secret

pub mod metrics;

use crate::errors::AccountError;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Not a secret-protection primitive: account numbers are low entropy. The
/// truncation keeps log lines joinable without printing the number itself.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad request bodies
    Validation,
    /// Missing/invalid credentials, cross-account access
    Authentication,
    /// Lookup misses
    NotFound,
    /// Database, crypto, anything else
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&AccountError> for ErrorCategory {
    fn from(err: &AccountError) -> Self {
        match err {
            AccountError::Validation(_) => ErrorCategory::Validation,
            AccountError::Unauthenticated | AccountError::InvalidCredentials => {
                ErrorCategory::Authentication
            }
            AccountError::NotFound => ErrorCategory::NotFound,
            AccountError::Database(_) | AccountError::Crypto(_) | AccountError::Internal => {
                ErrorCategory::Internal
            }
        }
    }
}
