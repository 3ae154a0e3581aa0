//! Sehhamate Library
//!
//! Nutrition requirement and allergy risk profile engines, a SQLite store for
//! generated profiles and the MCP tool surface over both.

pub mod allergy;
pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
