//! Quick search over a notes vault.
//!
//! This library exposes the core modules for integration testing while
//! keeping the actual binary entry point in main.rs.

pub mod chooser;
pub mod config;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod search;
pub mod session;
pub mod vault;
