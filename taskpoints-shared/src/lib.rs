//! # TaskPoints Shared Library
//!
//! Shared types and business logic used by the TaskPoints API server.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, JWT lifecycle, and the auth gate
//! - `models`: database models (users, tasks) with owner-scoped queries
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskPoints shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
