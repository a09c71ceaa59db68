//! # LightBnB Data Access
//!
//! This crate is the data-access layer for the LightBnB rental application.
//! It fetches and creates users, lists a guest's reservations, searches
//! properties with optional filters and inserts new listings, all against
//! PostgreSQL through a pooled connection.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool management and the `Store` data-access context
//! - `models`: Row types and the raw queries behind them
//! - `query`: Parameterized query construction for property search
//! - `error`: The `DbError` taxonomy returned by every operation

pub mod db;
pub mod error;
pub mod models;
pub mod query;

pub use db::pool::DatabaseConfig;
pub use db::store::Store;
pub use error::{DbError, DbResult};

/// Current version of the LightBnB data-access library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
