//! Persistence module
//!
//! Whole-file reads and writes for the line-oriented data files.

pub mod files;

pub use files::{read_optional, write_atomic, StoreError, StoreResult};
