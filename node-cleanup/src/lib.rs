//! node-cleanup library
//!
//! Finds Kubernetes nodes that are no longer Ready and deletes them.

pub mod cleanup;
pub mod config;
pub mod kubernetes;
pub mod logging;
pub mod output;

pub use cleanup::{CleanupOptions, CleanupReport};
pub use config::{CleanupConfig, ConfigError};
