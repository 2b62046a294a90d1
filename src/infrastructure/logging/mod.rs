//! Logging infrastructure
//!
//! Structured logging backbone:
//! - Backend logger with JSON and console output
//! - Process-wide registry and request contexts
//! - Sanitization of sensitive values and security events
//! - Adapters for the generic handler interface and `tracing`

pub mod adapter;
pub mod config;
pub mod context;
pub mod logger;
pub mod pipeline;
pub mod registry;
pub mod sanitizer;
pub mod security;
pub mod tracing_bridge;
pub mod writer;

pub use adapter::{
    from_backend_level, new_generic_logger, new_generic_logger_with_level, to_backend_level,
    GenericLogger, LogHandler,
};
pub use config::LoggerConfig;
pub use context::{
    context_with_correlation_id, context_with_logger, context_with_new_correlation_id,
    context_with_new_request_id, context_with_request_id, correlation_id_from_context, ctx,
    ctx_debug, ctx_err, ctx_error, ctx_info, ctx_warn, ctx_with, generate_correlation_id,
    generate_request_id, logger_from_context, request_id_from_context, Context,
    CORRELATION_ID_FIELD, REQUEST_ID_FIELD,
};
pub use logger::{
    Event, FatalEvent, Logger, LoggerBuilder, PanicEvent, CALLER_FIELD, ERROR_FIELD,
    LEVEL_FIELD, MESSAGE_FIELD, SHADOWED_FIELD_PREFIX, TIME_FIELD,
};
pub use pipeline::EventLogger;
pub use registry::{
    debug, err, error, fatal, get_level, global, info, init, init_from_env, is_level_enabled,
    logger, panic, set_level, set_level_string, set_logger, trace, warn, with, with_component,
    with_service, LoggerRegistry,
};
pub use sanitizer::{
    sanitize_email, sanitize_error, sanitize_session_id, sanitize_token, sanitize_user_id,
    sanitize_username, sanitize_value,
};
pub use security::{security_logger, SecurityLogger};
pub use tracing_bridge::{install_tracing_bridge, TracingBridge};
pub use writer::{LogWriter, SharedBuffer};
