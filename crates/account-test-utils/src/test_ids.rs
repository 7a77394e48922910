//! Fixed test data for deterministic tests

// Names
pub const TEST_FIRST_NAME_ALICE: &str = "Alice";
pub const TEST_FIRST_NAME_BOB: &str = "Bob";
pub const TEST_LAST_NAME: &str = "Tester";

// Passwords
pub const TEST_PASSWORD: &str = "test-password-do-not-use-in-production";
pub const TEST_WRONG_PASSWORD: &str = "not-the-password";

// Ids and numbers no test account ever gets
pub const UNKNOWN_ACCOUNT_ID: i32 = 999_999;
pub const UNKNOWN_ACCOUNT_NUMBER: i64 = 999_999_999_999_999;
