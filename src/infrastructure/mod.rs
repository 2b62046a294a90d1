//! Infrastructure layer module
//!
//! This module contains the logging backend and its integrations:
//! - Configuration loading (figment)
//! - Logger, registry, context propagation and sanitization
//! - Adapters for the generic handler port and `tracing`
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
