//! Cartolog - structured logging backbone
//!
//! One thread-safe, reconfigurable logging facility for a media-server
//! analytics service: correlation IDs propagated through request contexts,
//! sensitive values masked before they reach a sink, and adapters so
//! components written against a generic handler interface or `tracing` end
//! up on the same output.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): levels, generic records, security events
//!   and the [`Handler`] port
//! - **Infrastructure Layer** (`infrastructure`): configuration loading, the
//!   backend logger, registry, context, sanitizer and adapters
//!
//! # Example
//!
//! ```
//! use cartolog::{Context, LoggerConfig, SharedBuffer};
//!
//! let buf = SharedBuffer::new();
//! cartolog::init(LoggerConfig {
//!     level: "debug".to_string(),
//!     ..LoggerConfig::with_output(buf.clone())
//! });
//!
//! let ctx = Context::background().with_correlation_id("corr-123");
//! cartolog::ctx_info(&ctx).str("path", "/api/health").msg("request served");
//!
//! assert!(buf.contents().contains(r#""correlation_id":"corr-123""#));
//! ```

pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    Attr, AttrValue, GenericLevel, Level, LogFormat, ParseFormatError, ParseLevelError, Record,
    SecurityEvent,
};
pub use domain::ports::Handler;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::*;
