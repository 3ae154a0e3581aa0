//! Database module
//!
//! Handles SQLite connection and migrations for the profile store.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
