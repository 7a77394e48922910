//! Custom test assertions for expressive tests

use account_service::errors::WWW_AUTHENTICATE_CHALLENGE;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Session claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub account: i64,
    pub exp: i64,
    pub iat: i64,
}

fn decode_segment<T: for<'de> Deserialize<'de>>(token: &str, index: usize, what: &str) -> T {
    let segment = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no {} segment", what));
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {}: {}", what, e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT {} JSON: {}", what, e))
}

/// Custom assertions for session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_account(alice.number)
///     .assert_expires_in(900);
/// ```
pub trait TokenAssertions {
    /// Assert HS256 JWT shape with parseable session claims
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the token is bound to `number`
    fn assert_for_account(&self, number: i64) -> &Self;

    /// Assert `exp - iat` equals `seconds`
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        assert_eq!(
            self.split('.').count(),
            3,
            "JWT must have 3 parts (header.payload.signature)"
        );

        let header: JwtHeader = decode_segment(self, 0, "header");
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _: JwtClaims = decode_segment(self, 1, "payload");
        self
    }

    fn assert_for_account(&self, number: i64) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1, "payload");
        assert_eq!(claims.account, number, "Token bound to the wrong account");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1, "payload");
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Unexpected token lifetime"
        );
        self
    }
}

/// A rejected response, reduced to what the caller can observe.
#[derive(Debug, PartialEq, Eq)]
pub struct ObservedRejection {
    pub status: u16,
    pub www_authenticate: Option<String>,
    pub body: Vec<u8>,
}

/// Assert a response is the uniform access gate rejection and return what
/// was observed, so callers can compare rejections with each other.
pub async fn assert_permission_denied(response: reqwest::Response) -> ObservedRejection {
    let status = response.status().as_u16();
    let www_authenticate = response
        .headers()
        .get(reqwest::header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().expect("ASCII challenge").to_string());
    let body = response.bytes().await.expect("response body").to_vec();

    assert_eq!(status, 401, "Expected 401 Unauthorized");
    assert_eq!(
        www_authenticate.as_deref(),
        Some(WWW_AUTHENTICATE_CHALLENGE),
        "Missing or wrong WWW-Authenticate challenge"
    );

    let json: serde_json::Value = serde_json::from_slice(&body).expect("JSON error body");
    assert_eq!(json["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(json["error"]["message"], "Permission denied");

    ObservedRejection {
        status,
        www_authenticate,
        body,
    }
}
