//! PostgreSQL account store.

use super::AccountStore;
use crate::errors::AccountError;
use crate::models::{Account, NewAccount};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get(&self, id: i32) -> Result<Option<Account>, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to fetch account by id: {}", e)))?;

        Ok(account)
    }

    async fn get_by_number(&self, number: i64) -> Result<Option<Account>, AccountError> {
        // Numbers are not constraint-unique; the oldest account wins.
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM accounts
            WHERE number = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to fetch account by number: {}", e)))?;

        Ok(account)
    }

    async fn save(&self, account: NewAccount) -> Result<Account, AccountError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (first_name, last_name, number, password_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, number, password_hash, balance, created_at
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to create account: {}", e)))?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $1, last_name = $2, number = $3, balance = $4, created_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(account.balance)
        .bind(account.created_at)
        .bind(account.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to update account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::Database(format!("Failed to list accounts: {}", e)))?;

        Ok(accounts)
    }

    async fn health_check(&self) -> Result<(), AccountError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(format!("Health check failed: {}", e)))?;

        Ok(())
    }
}
