//! E2E tests for the access gate on account-scoped routes.
//!
//! Every rejection must be the same 401 response: status, challenge header
//! and body bytes. Tests here collect rejections from different causes and
//! compare them.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use account_service::models::NewAccount;
use account_test_utils::{
    assert_permission_denied, TestAccountServer, TestTokenBuilder, FOREIGN_JWT_SECRET,
    TEST_FIRST_NAME_ALICE, TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD,
    UNKNOWN_ACCOUNT_ID,
};
use reqwest::StatusCode;

fn seeded(number: i64, first_name: &str) -> NewAccount {
    NewAccount {
        first_name: first_name.to_string(),
        last_name: TEST_LAST_NAME.to_string(),
        number,
        password_hash: "unused".to_string(),
        balance: 0,
        created_at: chrono::Utc::now(),
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// ============================================================================
// Ownership
// ============================================================================

/// Accounts A (number 100) and B (number 200): A's token against B's id is
/// rejected with the same response as no credential at all.
#[tokio::test]
async fn test_gate_token_for_other_account_looks_like_missing_credential(
) -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;
    let a = server.store().save(seeded(100, TEST_FIRST_NAME_ALICE)).await?;
    let b = server.store().save(seeded(200, TEST_FIRST_NAME_BOB)).await?;
    let token_a = TestTokenBuilder::new().for_account(100).sign();

    // Act
    let own = server
        .get_account(&a.id.to_string(), Some(&bearer(&token_a)))
        .await?;
    let cross = server
        .get_account(&b.id.to_string(), Some(&bearer(&token_a)))
        .await?;
    let missing = server.get_account(&b.id.to_string(), None).await?;

    // Assert
    assert_eq!(own.status(), StatusCode::OK);
    let cross = assert_permission_denied(cross).await;
    let missing = assert_permission_denied(missing).await;
    assert_eq!(cross, missing);

    Ok(())
}

#[tokio::test]
async fn test_gate_cross_account_delete_rejected_and_target_kept() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let bob = server
        .create_account(TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    // Act
    let response = server
        .delete_account(&bob.id.to_string(), Some(&alice.authorization))
        .await?;

    // Assert
    assert_permission_denied(response).await;
    assert!(server.store().get(bob.id).await?.is_some());

    Ok(())
}

// ============================================================================
// Uniform rejection
// ============================================================================

#[tokio::test]
async fn test_gate_all_rejection_causes_indistinguishable() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let bob = server
        .create_account(TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let alice_id = alice.id.to_string();

    let expired = TestTokenBuilder::new()
        .for_account(alice.number)
        .expires_in(-60)
        .sign();
    let foreign = TestTokenBuilder::new()
        .for_account(alice.number)
        .signed_with(FOREIGN_JWT_SECRET)
        .sign();
    let oversized = "a".repeat(5000);

    let attempts: Vec<(&str, String, Option<String>)> = vec![
        ("no header", alice_id.clone(), None),
        ("empty header", alice_id.clone(), Some(String::new())),
        ("basic scheme", alice_id.clone(), Some("Basic YWxpY2U6cHc=".to_string())),
        ("garbage token", alice_id.clone(), Some(bearer("not-a-jwt"))),
        ("expired token", alice_id.clone(), Some(bearer(&expired))),
        ("foreign secret", alice_id.clone(), Some(bearer(&foreign))),
        ("oversized token", alice_id.clone(), Some(bearer(&oversized))),
        ("other account", alice_id.clone(), Some(bob.authorization.clone())),
        (
            "unknown account",
            UNKNOWN_ACCOUNT_ID.to_string(),
            Some(alice.authorization.clone()),
        ),
        ("non-numeric id", "abc".to_string(), Some(alice.authorization.clone())),
    ];

    // Act
    let mut observed = Vec::new();
    for (cause, id, authorization) in &attempts {
        let response = server.get_account(id, authorization.as_deref()).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "cause: {}", cause);
        observed.push((cause, assert_permission_denied(response).await));
    }

    // Assert
    let (first_cause, first) = &observed[0];
    for (cause, rejection) in &observed[1..] {
        assert_eq!(
            rejection, first,
            "'{}' rejection differs from '{}'",
            cause, first_cause
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_gate_lowercase_bearer_scheme_accepted() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    let response = server
        .get_account(
            &alice.id.to_string(),
            Some(&format!("bearer {}", alice.token())),
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

// ============================================================================
// Transfer
// ============================================================================

#[tokio::test]
async fn test_transfer_without_token_rejected() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/transfer", server.url()))
        .json(&serde_json::json!({"toAccount": 200, "amount": 10}))
        .send()
        .await?;

    assert_permission_denied(response).await;

    Ok(())
}

/// Transfer only requires some valid session; the source account is not
/// checked against the token.
#[tokio::test]
async fn test_transfer_with_any_valid_token_echoes_request() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let body = serde_json::json!({"toAccount": 200, "amount": 10});

    let response = server
        .client()
        .post(format!("{}/transfer", server.url()))
        .header(reqwest::header::AUTHORIZATION, &alice.authorization)
        .json(&body)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>().await?, body);

    Ok(())
}
