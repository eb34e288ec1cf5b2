//! Nutrilog Library
//!
//! Food catalog with composite foods, per-date calorie log with undo,
//! and profile-based calorie targets.

pub mod build_info;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod session;
pub mod store;
pub mod tools;
pub mod validation;
