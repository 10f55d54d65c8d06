//! Game Sales Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
/// Sales table access
///
/// Row models, the store trait, and the MySQL implementation.
pub mod sales;
