//! Integration tests for health, readiness and metrics endpoints

use account_service::errors::AccountError;
use account_service::models::{Account, NewAccount};
use account_service::repositories::AccountStore;
use account_test_utils::TestAccountServer;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

/// Store whose health check always fails.
struct UnreachableStore;

#[async_trait]
impl AccountStore for UnreachableStore {
    async fn get(&self, _id: i32) -> Result<Option<Account>, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn get_by_number(&self, _number: i64) -> Result<Option<Account>, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn save(&self, _account: NewAccount) -> Result<Account, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn update(&self, _account: &Account) -> Result<bool, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn delete(&self, _id: i32) -> Result<bool, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn list(&self) -> Result<Vec<Account>, AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
    async fn health_check(&self) -> Result<(), AccountError> {
        Err(AccountError::Database("unreachable".to_string()))
    }
}

// ============================================================================
// Liveness / Readiness
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok_when_store_healthy() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/ready", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ready");

    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_returns_503_when_store_unreachable() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn_with_store(Arc::new(UnreachableStore)).await?;

    let response = server
        .client()
        .get(format!("{}/ready", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "not_ready");

    // Liveness does not depend on the store.
    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_store_failure_surfaces_as_generic_500() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn_with_store(Arc::new(UnreachableStore)).await?;

    let response = server
        .client()
        .get(format!("{}/list_accounts", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await?;
    assert!(!text.contains("unreachable"), "Store detail leaked: {}", text);

    Ok(())
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_metrics_endpoint_serves_text() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    // Content depends on whether this server owns the global recorder.
    let _ = response.text().await?;

    Ok(())
}
