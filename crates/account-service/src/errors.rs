use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Challenge sent with every unauthenticated response.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = r#"Bearer realm="accounts""#;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, malformed, expired or mismatched credential.
    ///
    /// Carries no detail: every Access Gate rejection renders identically.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

/// Session token verification failure.
///
/// Only used inside the process; callers see [`AccountError::Unauthenticated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Bounded label for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

impl From<TokenError> for AccountError {
    fn from(_: TokenError) -> Self {
        AccountError::Unauthenticated
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AccountError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::Unauthenticated | AccountError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::Database(_) | AccountError::Crypto(_) | AccountError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            AccountError::Validation(reason) => ("VALIDATION_ERROR", reason.clone()),
            AccountError::Unauthenticated => ("UNAUTHENTICATED", "Permission denied".to_string()),
            AccountError::InvalidCredentials => {
                ("INVALID_CREDENTIALS", "Incorrect password".to_string())
            }
            AccountError::NotFound => ("NOT_FOUND", "Account not found".to_string()),
            AccountError::Database(detail) => {
                tracing::error!(target: "account.errors", error = %detail, "Database error");
                (
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AccountError::Crypto(detail) => {
                tracing::error!(target: "account.errors", error = %detail, "Cryptographic error");
                (
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            AccountError::Internal => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail { code, message },
        });

        if matches!(self, AccountError::Unauthenticated) {
            return (
                status,
                [(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
                )],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}
