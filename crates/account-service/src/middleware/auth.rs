//! Access gate for account-scoped routes.
//!
//! Two middleware functions:
//! - `require_account_owner` - valid session token AND the token's account
//!   number equals the number of the account named in the path
//! - `require_session` - valid session token only
//!
//! Every rejection renders as the same `401 Permission denied` response.
//! Which check failed is recorded in logs and metrics only, so the endpoint
//! cannot be used to learn whether an account exists or a token expired.

use crate::crypto::SessionClaims;
use crate::errors::{AccountError, TokenError};
use crate::handlers::account_handler::AppState;
use crate::models::Account;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_access_decision;
use crate::repositories::AccountStore;
use crate::services::token_service::SessionTokens;
use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// Account context established by the gate, available to handlers via
/// `Extension<AuthorizedAccount>`.
#[derive(Debug, Clone)]
pub struct AuthorizedAccount {
    pub account: Account,
    pub claims: SessionClaims,
}

/// Why the gate refused a request. Never sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// No `Authorization` header, or an empty one.
    NoCredential,
    /// Wrong scheme, or the token failed verification.
    InvalidCredential(TokenError),
    /// The path did not name an account that could be loaded.
    UnresolvedAccount,
    /// Valid token for a different account.
    Forbidden,
}

impl GateRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateRejection::NoCredential => "no_credential",
            GateRejection::InvalidCredential(_) => "invalid_credential",
            GateRejection::UnresolvedAccount => "unresolved_account",
            GateRejection::Forbidden => "forbidden",
        }
    }
}

impl From<GateRejection> for AccountError {
    fn from(rejection: GateRejection) -> Self {
        record_access_decision(rejection.as_str());
        match rejection {
            GateRejection::Forbidden => {
                tracing::warn!(target: "account.middleware.auth", "Cross-account access rejected");
            }
            GateRejection::InvalidCredential(reason) => {
                tracing::debug!(
                    target: "account.middleware.auth",
                    reason = reason.as_str(),
                    "Invalid session token"
                );
            }
            other => {
                tracing::debug!(
                    target: "account.middleware.auth",
                    reason = other.as_str(),
                    "Request rejected"
                );
            }
        }
        AccountError::Unauthenticated
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(value: Option<&HeaderValue>) -> Result<&str, GateRejection> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(GateRejection::NoCredential),
    };

    let value = value
        .to_str()
        .map_err(|_| GateRejection::InvalidCredential(TokenError::Malformed))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(GateRejection::InvalidCredential(TokenError::Malformed))?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(GateRejection::InvalidCredential(TokenError::Malformed));
    }

    Ok(token)
}

/// Verify the credential only (steps 1-2 of the gate).
pub fn authenticate(
    sessions: &SessionTokens,
    auth_header: Option<&HeaderValue>,
) -> Result<SessionClaims, GateRejection> {
    let token = extract_bearer_token(auth_header)?;
    sessions
        .verify(token)
        .map_err(GateRejection::InvalidCredential)
}

/// Full gate: verify the credential, resolve the target account, and check
/// that the token was issued for it.
///
/// The credential is checked before the path or the store are consulted.
#[instrument(skip_all)]
pub async fn check_access(
    store: &dyn AccountStore,
    sessions: &SessionTokens,
    auth_header: Option<&HeaderValue>,
    target_id: Option<i32>,
) -> Result<AuthorizedAccount, GateRejection> {
    let claims = authenticate(sessions, auth_header)?;

    let target_id = target_id.ok_or(GateRejection::UnresolvedAccount)?;
    let account = match store.get(target_id).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(GateRejection::UnresolvedAccount),
        Err(e) => {
            tracing::warn!(
                target: "account.middleware.auth",
                error = %e,
                "Account lookup failed during authorization"
            );
            return Err(GateRejection::UnresolvedAccount);
        }
    };

    if account.number != claims.account_number {
        tracing::debug!(
            target: "account.middleware.auth",
            account_id = account.id,
            token_account = %hash_for_correlation(&claims.account_number.to_string()),
            "Token bound to a different account"
        );
        return Err(GateRejection::Forbidden);
    }

    Ok(AuthorizedAccount { account, claims })
}

/// Ownership-checked authentication middleware.
///
/// Applied with `route_layer` so the `{id}` path parameter is available.
/// Injects `AuthorizedAccount` into request extensions on success.
#[instrument(skip_all, name = "account.middleware.owner")]
pub async fn require_account_owner(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AccountError> {
    let target_id = path.ok().map(|Path(id)| id);

    let authorized = check_access(
        state.store.as_ref(),
        &state.sessions,
        req.headers().get(header::AUTHORIZATION),
        target_id,
    )
    .await?;

    record_access_decision("admitted");
    req.extensions_mut().insert(authorized);

    Ok(next.run(req).await)
}

/// Session-only authentication middleware.
///
/// Injects `SessionClaims` into request extensions on success.
#[instrument(skip_all, name = "account.middleware.session")]
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AccountError> {
    let claims = authenticate(&state.sessions, req.headers().get(header::AUTHORIZATION))?;

    record_access_decision("admitted");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
