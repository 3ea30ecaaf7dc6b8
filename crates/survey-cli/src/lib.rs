//! Survey check CLI library.
//!
//! The binary is a thin argument layer over [`commands`]; the rest is exposed
//! for integration tests.

pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
