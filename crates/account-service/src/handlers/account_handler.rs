use crate::crypto::SessionClaims;
use crate::errors::AccountError;
use crate::middleware::auth::AuthorizedAccount;
use crate::models::{
    Account, CreateAccountRequest, DeleteAccountResponse, LoginRequest, LoginResponse,
    TransferRequest,
};
use crate::observability::metrics::record_error;
use crate::observability::{hash_for_correlation, ErrorCategory};
use crate::repositories::AccountStore;
use crate::services::account_service;
use crate::services::token_service::{IssuedToken, SessionTokens};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub sessions: SessionTokens,
    pub bcrypt_cost: u32,
    /// Stand-in hash for logins against unknown numbers, at `bcrypt_cost`.
    pub dummy_password_hash: String,
}

impl AppState {
    /// Build the shared state. Hashes the login dummy once, at the same cost
    /// new accounts are hashed with.
    pub fn new(
        store: Arc<dyn AccountStore>,
        sessions: SessionTokens,
        bcrypt_cost: u32,
    ) -> Result<Self, AccountError> {
        let dummy_password_hash = account_service::dummy_password_hash(bcrypt_cost)?;
        Ok(Self {
            store,
            sessions,
            bcrypt_cost,
            dummy_password_hash,
        })
    }
}

/// Count failed operations by category before they become responses.
fn observe<T>(operation: &'static str, result: Result<T, AccountError>) -> Result<T, AccountError> {
    if let Err(e) = &result {
        record_error(
            operation,
            ErrorCategory::from(e).as_str(),
            e.status_code().as_u16(),
        );
    }
    result
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AccountError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AccountError::Validation(rejection.body_text()))
}

fn with_bearer(token: &IssuedToken, body: impl IntoResponse) -> Result<Response, AccountError> {
    let value = HeaderValue::from_str(&token.bearer_header()).map_err(|_| AccountError::Internal)?;
    Ok(([(header::AUTHORIZATION, value)], body).into_response())
}

async fn create(
    state: &AppState,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Response, AccountError> {
    let request = parse_body(payload)?;
    let (account, token) = account_service::create_account(
        state.store.as_ref(),
        &state.sessions,
        state.bcrypt_cost,
        &request,
    )
    .await?;
    with_bearer(&token, Json(account))
}

async fn login(
    state: &AppState,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AccountError> {
    let request = parse_body(payload)?;
    let (response, token): (LoginResponse, IssuedToken) =
        account_service::login(
            state.store.as_ref(),
            &state.sessions,
            &state.dummy_password_hash,
            &request,
        )
        .await?;
    with_bearer(&token, Json(response))
}

/// Handle account creation
///
/// POST /create
pub async fn handle_create_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Response, AccountError> {
    observe("create", create(&state, payload).await)
}

/// Handle login
///
/// POST /login
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AccountError> {
    observe("login", login(&state, payload).await)
}

/// Handle account retrieval for the token's own account
///
/// GET /accounts/{id}
pub async fn handle_get_account(
    State(state): State<Arc<AppState>>,
    Extension(authorized): Extension<AuthorizedAccount>,
) -> Result<Json<Account>, AccountError> {
    observe(
        "get",
        account_service::get_account(state.store.as_ref(), authorized.account.id).await,
    )
    .map(Json)
}

/// Handle account listing
///
/// GET /list_accounts
pub async fn handle_list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AccountError> {
    observe(
        "list",
        account_service::list_accounts(state.store.as_ref()).await,
    )
    .map(Json)
}

/// Handle account deletion for the token's own account
///
/// DELETE /accounts/{id}/delete
pub async fn handle_delete_account(
    State(state): State<Arc<AppState>>,
    Extension(authorized): Extension<AuthorizedAccount>,
) -> Result<Json<DeleteAccountResponse>, AccountError> {
    observe(
        "delete",
        account_service::delete_account(state.store.as_ref(), authorized.account.id).await,
    )
    .map(Json)
}

/// Handle transfer (validate and echo)
///
/// POST /transfer
pub async fn handle_transfer(
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferRequest>, AccountError> {
    tracing::debug!(
        target: "account.handlers",
        from_account = %hash_for_correlation(&claims.account_number.to_string()),
        "Transfer requested"
    );

    observe(
        "transfer",
        parse_body(payload).and_then(account_service::transfer),
    )
    .map(Json)
}
