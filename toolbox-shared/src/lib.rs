//! # AI Toolbox Shared Library
//!
//! Storage, authentication and tool logic shared by the AI Toolbox API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: JSON-file record store
//! - `models`: Users, tool usage, favorites and feedback records
//! - `auth`: Password hashing, bearer tokens, sessions and the auth middleware
//! - `tools`: Tool catalog and stubbed generators

pub mod auth;
pub mod db;
pub mod models;
pub mod tools;

/// Current version of the AI Toolbox shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
