//! CLI command implementations.

pub mod common;
pub mod config;
pub mod exact;
pub mod groups;
pub mod version;
