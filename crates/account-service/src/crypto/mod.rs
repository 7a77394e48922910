use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::{AccountError, TokenError};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Session tokens are ~150 bytes. Anything larger is rejected before any
/// base64 decoding or HMAC work is done.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Session token claims.
///
/// Produced only by [`verify_session_jwt`] after the signature has been
/// checked, so every field can be trusted by callers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Business account number the bearer authenticated as.
    #[serde(rename = "account")]
    pub account_number: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Account numbers are identifiers; keep them out of debug output.
impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("account_number", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .finish()
    }
}

/// Hash a password with bcrypt.
///
/// The salt is random per call and embedded in the returned hash along with
/// the cost.
///
/// # Errors
///
/// Returns `AccountError::Crypto` if the cost is outside 10-14 or bcrypt
/// fails (entropy or resource exhaustion).
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AccountError> {
    // Config validates this too; direct callers must not get weaker hashes.
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AccountError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| AccountError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
///
/// Comparison is constant-time inside the bcrypt crate.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AccountError::Crypto(format!("Password verification failed: {}", e)))
}

/// Sign session claims with HS256.
#[instrument(skip_all)]
pub fn sign_session_jwt(
    claims: &SessionClaims,
    encoding_key: &EncodingKey,
) -> Result<String, AccountError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, encoding_key)
        .map_err(|e| AccountError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify an HS256 session token and extract its claims.
///
/// Validates, in order:
/// - Token size (must be <= MAX_JWT_SIZE_BYTES)
/// - Signature and algorithm
/// - Expiration: `exp` must be present and the token is expired when
///   `now >= exp`. Only the `now` passed in is consulted, never the system
///   clock.
///
/// Claims are deserialized by `jsonwebtoken` only after the signature check
/// succeeds.
#[instrument(skip_all)]
pub fn verify_session_jwt(
    token: &str,
    decoding_key: &DecodingKey,
    now: i64,
) -> Result<SessionClaims, TokenError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenError::Malformed);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);
    validation.validate_exp = false;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, decoding_key, &validation).map_err(|e| {
        let mapped = match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        };
        tracing::debug!(target: "crypto", error = %e, reason = mapped.as_str(), "Token verification failed");
        mapped
    })?;

    // An expiry instant is already too late.
    if now >= token_data.claims.exp {
        tracing::debug!(
            target: "crypto",
            exp = token_data.claims.exp,
            now = now,
            "Token rejected: expired"
        );
        return Err(TokenError::Expired);
    }

    Ok(token_data.claims)
}
