//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Programmatic defaults
//! - YAML file loading
//! - `LOG_*` environment variable overrides
//! - Strict validation for callers that want it

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, FUZZ_MODE_ENV};
