//! Account persistence.
//!
//! The service depends only on [`AccountStore`]. `PgAccountStore` is the
//! production implementation; `InMemoryAccountStore` backs tests and the
//! test server harness.

pub mod accounts;
pub mod memory;

pub use accounts::PgAccountStore;
pub use memory::InMemoryAccountStore;

use crate::errors::AccountError;
use crate::models::{Account, NewAccount};
use async_trait::async_trait;

/// Account store contract.
///
/// Implementations never retry; a failed call surfaces as
/// `AccountError::Database` for the current request only.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get account by surrogate id.
    async fn get(&self, id: i32) -> Result<Option<Account>, AccountError>;

    /// Get account by business number.
    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, AccountError>;

    /// Persist a new account and return it with its assigned id.
    async fn save(&self, account: NewAccount) -> Result<Account, AccountError>;

    /// Overwrite the mutable fields of an existing account.
    ///
    /// Returns `false` if no account has `account.id`. The password hash is
    /// not touched.
    async fn update(&self, account: &Account) -> Result<bool, AccountError>;

    /// Hard-delete an account. Returns `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, AccountError>;

    /// All accounts, ordered by id.
    async fn list(&self) -> Result<Vec<Account>, AccountError>;

    /// Cheap reachability probe for the readiness endpoint.
    async fn health_check(&self) -> Result<(), AccountError>;
}
