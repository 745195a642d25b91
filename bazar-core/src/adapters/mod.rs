//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the ListStore port and local credentials
//! - Remote HTTP client for ListStore and SessionProvider
//! - Argon2-backed local session provider
//! - session.json persistence shared by both providers

pub mod duckdb;
pub mod local_auth;
pub mod remote;
pub mod session_file;

#[cfg(test)]
pub mod remote_mock;
