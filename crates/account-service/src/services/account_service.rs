//! Account operations behind the HTTP handlers.
//!
//! Ownership of the target account is already established by the access
//! gate when `get_account` and `delete_account` run; these functions do not
//! re-check it.

use crate::crypto;
use crate::errors::AccountError;
use crate::models::{
    is_valid_account_number, Account, CreateAccountRequest, DeleteAccountResponse, LoginRequest,
    LoginResponse, NewAccount, TransferRequest,
};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_bcrypt_duration;
use crate::repositories::AccountStore;
use crate::services::token_service::{IssuedToken, SessionTokens, TOKEN_TYPE};
use secrecy::ExposeSecret;
use std::time::Instant;
use tracing::instrument;

/// Longest accepted first or last name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

const DUMMY_PASSWORD: &str = "no-such-account-password";

/// Hash verified when the login number is unknown, so both branches pay for
/// one bcrypt verification at the same cost as stored hashes.
pub fn dummy_password_hash(bcrypt_cost: u32) -> Result<String, AccountError> {
    crypto::hash_password(DUMMY_PASSWORD, bcrypt_cost)
}

fn validate_name(field: &str, value: &str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(AccountError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn timed_hash(password: &str, cost: u32) -> Result<String, AccountError> {
    let started = Instant::now();
    let result = crypto::hash_password(password, cost);
    record_bcrypt_duration("hash", started.elapsed());
    result
}

fn timed_verify(password: &str, hash: &str) -> Result<bool, AccountError> {
    let started = Instant::now();
    let result = crypto::verify_password(password, hash);
    record_bcrypt_duration("verify", started.elapsed());
    result
}

/// Create an account and open a session for it.
///
/// The returned account carries its store-assigned id and a fresh random
/// number; the balance starts at zero.
#[instrument(skip_all)]
pub async fn create_account(
    store: &dyn AccountStore,
    sessions: &SessionTokens,
    bcrypt_cost: u32,
    request: &CreateAccountRequest,
) -> Result<(Account, IssuedToken), AccountError> {
    validate_name("firstName", &request.first_name)?;
    validate_name("lastName", &request.last_name)?;
    if request.password.expose_secret().is_empty() {
        return Err(AccountError::Validation(
            "password must not be empty".to_string(),
        ));
    }

    let password_hash = timed_hash(request.password.expose_secret(), bcrypt_cost)?;
    let new_account = NewAccount::new(
        request.first_name.trim(),
        request.last_name.trim(),
        password_hash,
    )?;

    let account = store.save(new_account).await?;
    let token = sessions.issue(&account)?;

    tracing::info!(
        target: "account.services",
        account_id = account.id,
        account = %hash_for_correlation(&account.number.to_string()),
        "Account created"
    );

    Ok((account, token))
}

/// Check a password for an account number and open a session on success.
///
/// Unknown number: `NotFound`, after checking the password against
/// `dummy_hash` (see [`dummy_password_hash`]). Wrong password:
/// `InvalidCredentials`, and no token is issued.
#[instrument(skip_all)]
pub async fn login(
    store: &dyn AccountStore,
    sessions: &SessionTokens,
    dummy_hash: &str,
    request: &LoginRequest,
) -> Result<(LoginResponse, IssuedToken), AccountError> {
    let correlation = hash_for_correlation(&request.number.to_string());
    let password = request.password.expose_secret();

    let Some(account) = store.get_by_number(request.number).await? else {
        // The outcome does not depend on the dummy check.
        let _ = timed_verify(password, dummy_hash);
        tracing::debug!(
            target: "account.services",
            account = %correlation,
            "Login for unknown account number"
        );
        return Err(AccountError::NotFound);
    };

    if !timed_verify(password, &account.password_hash)? {
        tracing::debug!(
            target: "account.services",
            account_id = account.id,
            account = %correlation,
            "Login rejected: incorrect password"
        );
        return Err(AccountError::InvalidCredentials);
    }

    let token = sessions.issue(&account)?;

    tracing::info!(
        target: "account.services",
        account_id = account.id,
        account = %correlation,
        "Login succeeded"
    );

    Ok((
        LoginResponse {
            number: account.number,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: token.expires_in,
        },
        token,
    ))
}

#[instrument(skip_all)]
pub async fn get_account(store: &dyn AccountStore, id: i32) -> Result<Account, AccountError> {
    store.get(id).await?.ok_or(AccountError::NotFound)
}

#[instrument(skip_all)]
pub async fn list_accounts(store: &dyn AccountStore) -> Result<Vec<Account>, AccountError> {
    store.list().await
}

/// Hard-delete an account. Tokens already issued for it stop working at the
/// gate because the account no longer resolves.
#[instrument(skip_all)]
pub async fn delete_account(
    store: &dyn AccountStore,
    id: i32,
) -> Result<DeleteAccountResponse, AccountError> {
    if !store.delete(id).await? {
        return Err(AccountError::NotFound);
    }

    tracing::info!(target: "account.services", account_id = id, "Account deleted");

    Ok(DeleteAccountResponse { deleted: id })
}

/// Validate a transfer request and echo it back.
///
/// No balance moves. A real transfer would need an atomic debit/credit of
/// both accounts and an insufficient-funds check.
#[instrument(skip_all)]
pub fn transfer(request: TransferRequest) -> Result<TransferRequest, AccountError> {
    if request.amount <= 0 {
        return Err(AccountError::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }
    if !is_valid_account_number(request.to_account) {
        return Err(AccountError::Validation(
            "toAccount is not a valid account number".to_string(),
        ));
    }

    tracing::info!(
        target: "account.services",
        to_account = %hash_for_correlation(&request.to_account.to_string()),
        amount = request.amount,
        "Transfer accepted"
    );

    Ok(request)
}
