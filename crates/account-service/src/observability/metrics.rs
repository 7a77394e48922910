//! Metrics definitions for the account service
//!
//! All metrics follow Prometheus naming conventions:
//! - `account_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Every label takes values from a fixed set in code:
//! - `status`: success, error
//! - `error_category`: none, malformed, invalid_signature, expired, validation,
//!   authentication, not_found, internal
//! - `decision`: admitted, no_credential, invalid_credential,
//!   unresolved_account, forbidden
//! - `operation`: create, login, get, list, delete, transfer, hash, verify

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// Token Metrics
// ============================================================================

/// Record session token issuance outcome
///
/// Metric: `account_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &'static str) {
    counter!("account_token_issuance_total", "status" => status).increment(1);
}

/// Record token validation result
///
/// Metric: `account_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &'static str, error_category: Option<&'static str>) {
    let category = error_category.unwrap_or("none");
    counter!("account_token_validations_total", "status" => status, "error_category" => category)
        .increment(1);
}

// ============================================================================
// Access Gate Metrics
// ============================================================================

/// Record an access gate decision
///
/// Metric: `account_access_decisions_total`
/// Labels: `decision`
///
/// The HTTP response is identical for every rejection; this counter is the
/// only place the reasons are distinguished.
pub fn record_access_decision(decision: &'static str) {
    counter!("account_access_decisions_total", "decision" => decision).increment(1);
}

// ============================================================================
// Crypto Metrics
// ============================================================================

/// Record bcrypt operation duration
///
/// Metric: `account_bcrypt_duration_seconds`
/// Labels: `operation` (hash, verify)
pub fn record_bcrypt_duration(operation: &'static str, duration: Duration) {
    histogram!("account_bcrypt_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

// ============================================================================
// Error Metrics
// ============================================================================

/// Record error by category
///
/// Metric: `account_errors_total`
/// Labels: `operation`, `error_category`, `status_code`
pub fn record_error(operation: &'static str, error_category: &'static str, status_code: u16) {
    counter!("account_errors_total",
        "operation" => operation,
        "error_category" => error_category,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}
