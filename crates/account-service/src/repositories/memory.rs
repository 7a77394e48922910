//! In-memory account store.

use super::AccountStore;
use crate::errors::AccountError;
use crate::models::{Account, NewAccount};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i32,
    accounts: BTreeMap<i32, Account>,
}

/// Account store kept in process memory.
///
/// Ids start at 1 and are never reused, like a `SERIAL` column.
#[derive(Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Inner>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get(&self, id: i32) -> Result<Option<Account>, AccountError> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, AccountError> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .find(|account| account.number == number)
            .cloned())
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut inner = self.inner.write().await;
        inner.next_id = inner
            .next_id
            .checked_add(1)
            .ok_or_else(|| AccountError::Database("Account id sequence exhausted".to_string()))?;

        let account = account.into_account(inner.next_id);
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountError> {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(&account.id) {
            Some(existing) => {
                existing.first_name = account.first_name.clone();
                existing.last_name = account.last_name.clone();
                existing.number = account.number;
                existing.balance = account.balance;
                existing.created_at = account.created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, AccountError> {
        Ok(self.inner.write().await.accounts.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.inner.read().await.accounts.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), AccountError> {
        Ok(())
    }
}
