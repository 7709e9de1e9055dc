//! # QRBoxer Shared Library
//!
//! Data layer and authentication primitives used by the QRBoxer API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool, migrations and SQL fragment builders
//! - `models`: users, moves, boxes and items with their CRUD operations
//! - `auth`: password hashing and signed user tokens
//! - `error`: model error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the QRBoxer shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
