//! Test server harness for E2E testing
//!
//! Provides `TestAccountServer` for spawning real account service instances
//! in tests, backed by an in-memory store.

use crate::crypto_fixtures::test_config;
use account_service::config::Config;
use account_service::handlers::account_handler::AppState;
use account_service::repositories::{AccountStore, InMemoryAccountStore};
use account_service::routes;
use account_service::services::token_service::SessionTokens;
use anyhow::{anyhow, Context};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// An account created through the HTTP API.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub id: i32,
    pub number: i64,
    /// Full `Authorization` header value returned by `/create`.
    pub authorization: String,
    pub body: serde_json::Value,
}

impl CreatedAccount {
    /// The raw token without the `Bearer ` prefix.
    pub fn token(&self) -> String {
        self.authorization
            .strip_prefix("Bearer ")
            .unwrap_or(&self.authorization)
            .to_string()
    }
}

/// Test harness for spawning the account service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_get_own_account() -> anyhow::Result<()> {
///     let server = TestAccountServer::spawn().await?;
///     let alice = server.create_account("Alice", "Tester", "pw").await?;
///
///     let response = server
///         .client()
///         .get(format!("{}/accounts/{}", server.url(), alice.id))
///         .header("Authorization", &alice.authorization)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAccountServer {
    addr: SocketAddr,
    store: Arc<dyn AccountStore>,
    config: Config,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestAccountServer {
    /// Spawn a server with a fresh in-memory store
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemoryAccountStore::new())).await
    }

    /// Spawn a server over the given store
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs
    /// in the background until the harness is dropped.
    pub async fn spawn_with_store(store: Arc<dyn AccountStore>) -> Result<Self, anyhow::Error> {
        let config = test_config().map_err(|e| anyhow!("Invalid test config: {}", e))?;

        let state = AppState::new(
            store.clone(),
            SessionTokens::new(&config.jwt_secret),
            config.bcrypt_cost,
        )
        .map_err(|e| anyhow!("Failed to build application state: {}", e))?;
        let state = Arc::new(state);

        // The global recorder can be installed once per process; later
        // servers get a standalone recorder.
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test server")?;
        let addr = listener
            .local_addr()
            .context("Failed to get local address")?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            config,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Direct access to the backing store
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Create an account through `POST /create`
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<CreatedAccount, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/create", self.url()))
            .json(&json!({
                "firstName": first_name,
                "lastName": last_name,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Create failed with status {}", response.status()));
        }

        let authorization = response
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .context("Create response has no Authorization header")?
            .to_str()?
            .to_string();
        let body: serde_json::Value = response.json().await?;

        let id = body["id"]
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .context("Create response has no id")?;
        let number = body["accountNumber"]
            .as_i64()
            .context("Create response has no accountNumber")?;

        Ok(CreatedAccount {
            id,
            number,
            authorization,
            body,
        })
    }

    /// Send `POST /login`
    pub async fn login(
        &self,
        number: i64,
        password: &str,
    ) -> Result<reqwest::Response, anyhow::Error> {
        Ok(self
            .client
            .post(format!("{}/login", self.url()))
            .json(&json!({"accountNumber": number, "password": password}))
            .send()
            .await?)
    }

    /// Send `GET /accounts/{id}` with an optional raw `Authorization` value
    pub async fn get_account(
        &self,
        id: &str,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let mut request = self.client.get(format!("{}/accounts/{}", self.url(), id));
        if let Some(value) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }
        Ok(request.send().await?)
    }

    /// Send `DELETE /accounts/{id}/delete` with an optional raw `Authorization` value
    pub async fn delete_account(
        &self,
        id: &str,
        authorization: Option<&str>,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let mut request = self
            .client
            .delete(format!("{}/accounts/{}/delete", self.url(), id));
        if let Some(value) = authorization {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }
        Ok(request.send().await?)
    }
}

impl Drop for TestAccountServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
