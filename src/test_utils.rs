//! # Test Utilities
//!
//! Environment helpers for tests that work both locally and in CI. Existing
//! environment variables always win over the local defaults.

use std::env;
use uuid::Uuid;

/// Generate a fresh bulk uuid for fixtures.
pub fn fresh_bulk_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Get database URL for Postgres-backed tests with a local fallback.
pub fn get_test_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/bulk_status_test".to_string())
}

/// Setup test environment variables if they're not already present.
pub fn setup_test_environment() {
    if env::var("BULK_STATUS_ENV").is_err() {
        env::set_var("BULK_STATUS_ENV", "test");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_fallback() {
        let url = get_test_database_url();
        assert!(url.starts_with("postgresql://"));
    }

    #[test]
    fn test_fresh_bulk_uuids_are_unique() {
        assert_ne!(fresh_bulk_uuid(), fresh_bulk_uuid());
    }
}
