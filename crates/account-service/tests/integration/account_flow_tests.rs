//! E2E tests for create, login, get, list and delete.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use account_service::models::is_valid_account_number;
use account_test_utils::{
    assert_permission_denied, TestAccountServer, TokenAssertions, TEST_FIRST_NAME_ALICE,
    TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD, TEST_WRONG_PASSWORD,
    UNKNOWN_ACCOUNT_NUMBER,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Create
// ============================================================================

/// POST /create → 200 with a generated number, a bearer token in the
/// Authorization header and no password field; the token opens the account
/// it was issued for.
#[tokio::test]
async fn test_create_happy_path_then_get_with_token() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;

    // Act
    let response = server
        .client()
        .post(format!("{}/create", server.url()))
        .json(&json!({"firstName": "A", "lastName": "B", "password": "pw"}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let authorization = response
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .expect("Authorization header on create")
        .to_str()?
        .to_string();
    assert!(authorization.starts_with("Bearer "));

    let text = response.text().await?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    let number = body["accountNumber"].as_i64().expect("accountNumber");
    assert!(is_valid_account_number(number));
    assert_eq!(body["firstName"], "A");
    assert_eq!(body["lastName"], "B");
    assert_eq!(body["balance"], 0);
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(!text.contains("$2b$"), "Password hash leaked: {}", text);

    let token = authorization.trim_start_matches("Bearer ").to_string();
    token
        .assert_valid_jwt()
        .assert_for_account(number)
        .assert_expires_in(900);

    let id = body["id"].as_i64().expect("id").to_string();
    let response = server.get_account(&id, Some(&authorization)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: serde_json::Value = response.json().await?;
    assert_eq!(fetched["accountNumber"], number);

    let response = server.get_account(&id, None).await?;
    assert_permission_denied(response).await;

    Ok(())
}

#[tokio::test]
async fn test_create_blank_name_rejected() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/create", server.url()))
        .json(&json!({"firstName": "  ", "lastName": "B", "password": "pw"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(server.store().list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_missing_field_rejected() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/create", server.url()))
        .json(&json!({"firstName": "A", "password": "pw"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_create_assigns_distinct_numbers() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let bob = server
        .create_account(TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    assert_ne!(alice.id, bob.id);
    assert_ne!(alice.number, bob.number);

    Ok(())
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_correct_password_issues_token() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    // Act
    let response = server.login(alice.number, TEST_PASSWORD).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let authorization = response
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .expect("Authorization header on login")
        .to_str()?
        .to_string();

    let text = response.text().await?;
    assert!(!text.contains(TEST_PASSWORD), "Login echoed the password");
    let body: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(
        body,
        json!({"accountNumber": alice.number, "tokenType": "Bearer", "expiresIn": 900})
    );

    // The fresh token works at the gate.
    let response = server
        .get_account(&alice.id.to_string(), Some(&authorization))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password_no_token() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    let response = server.login(alice.number, TEST_WRONG_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .is_none());
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    Ok(())
}

#[tokio::test]
async fn test_login_unknown_number_not_found() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;

    let response = server.login(UNKNOWN_ACCOUNT_NUMBER, TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .is_none());

    Ok(())
}

// ============================================================================
// List / Delete
// ============================================================================

#[tokio::test]
async fn test_list_accounts_hides_password_material() -> Result<(), anyhow::Error> {
    let server = TestAccountServer::spawn().await?;
    server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    server
        .create_account(TEST_FIRST_NAME_BOB, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;

    let response = server
        .client()
        .get(format!("{}/list_accounts", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let text = response.text().await?;
    assert!(!text.contains("$2b$"));
    assert!(!text.contains(TEST_PASSWORD));
    let body: serde_json::Value = serde_json::from_str(&text)?;
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|a| a["firstName"].as_str())
        .collect();
    assert_eq!(names, vec![TEST_FIRST_NAME_ALICE, TEST_FIRST_NAME_BOB]);

    Ok(())
}

/// Delete then Get of the same id: the account is gone from the store and
/// the old token no longer opens anything.
#[tokio::test]
async fn test_delete_then_get_not_found() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAccountServer::spawn().await?;
    let alice = server
        .create_account(TEST_FIRST_NAME_ALICE, TEST_LAST_NAME, TEST_PASSWORD)
        .await?;
    let id = alice.id.to_string();

    // Act
    let response = server
        .delete_account(&id, Some(&alice.authorization))
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, json!({"deleted": alice.id}));

    assert!(server.store().get(alice.id).await?.is_none());

    let response = server.get_account(&id, Some(&alice.authorization)).await?;
    assert_permission_denied(response).await;

    let response = server.login(alice.number, TEST_PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
