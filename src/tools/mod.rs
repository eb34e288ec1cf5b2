//! Nutrilog Tools module
//!
//! Tool implementations over a loaded [`Session`](crate::session::Session).
//! Each function returns a serializable response.

pub mod foods;
pub mod log;
pub mod profile;
pub mod status;
