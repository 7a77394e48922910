//! # Account Test Utilities
//!
//! Shared test utilities for the account service.
//!
//! This crate provides:
//! - Fixed signing secrets and a ready-made `Config`
//! - Session token builder for forged, expired, or foreign tokens
//! - Server test harness (`TestAccountServer` for E2E tests)
//! - Fixed test data constants
//! - Custom assertions (`TokenAssertions`, uniform rejection checks)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use account_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestAccountServer::spawn().await?;
//!     let alice = server.create_account("Alice", "Tester", TEST_PASSWORD).await?;
//!
//!     alice.token().assert_valid_jwt().assert_for_account(alice.number);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
