//! Sehhamate Tools module
//!
//! MCP tool implementations over the profile engines, the profile store and the
//! medication interaction checks.

pub mod medication;
pub mod profiles;
pub mod scan;
pub mod status;
