//! Request-scoped identifiers carried through call chains.
//!
//! A [`Context`] is an immutable value: every `with_*` call returns a new
//! context and leaves the receiver untouched, so a parent context can be
//! shared freely while handlers derive their own.
//!
//! ```
//! use cartolog::{Context, Logger, SharedBuffer};
//!
//! let buf = SharedBuffer::new();
//! let ctx = Context::background()
//!     .with_logger(Logger::new(buf.clone()))
//!     .with_correlation_id("corr-123");
//!
//! cartolog::ctx_info(&ctx).msg("handling request");
//! assert!(buf.contents().contains("\"correlation_id\":\"corr-123\""));
//! ```

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::logger::{Event, Logger, LoggerBuilder};
use super::registry;

/// Field name for the correlation ID.
pub const CORRELATION_ID_FIELD: &str = "correlation_id";
/// Field name for the request ID.
pub const REQUEST_ID_FIELD: &str = "request_id";

/// Immutable bag of request-scoped logging state.
#[derive(Clone, Default)]
pub struct Context {
    correlation_id: Option<Arc<str>>,
    request_id: Option<Arc<str>>,
    logger: Option<Logger>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Copy carrying `id` as correlation ID.
    #[must_use]
    pub fn with_correlation_id(&self, id: impl AsRef<str>) -> Self {
        Self {
            correlation_id: non_empty(id.as_ref()),
            ..self.clone()
        }
    }

    /// Copy carrying a freshly generated correlation ID.
    #[must_use]
    pub fn with_new_correlation_id(&self) -> Self {
        self.with_correlation_id(generate_correlation_id())
    }

    /// Copy carrying `id` as request ID.
    #[must_use]
    pub fn with_request_id(&self, id: impl AsRef<str>) -> Self {
        Self {
            request_id: non_empty(id.as_ref()),
            ..self.clone()
        }
    }

    /// Copy carrying a freshly generated request ID.
    #[must_use]
    pub fn with_new_request_id(&self) -> Self {
        self.with_request_id(generate_request_id())
    }

    /// Copy carrying a pre-built logger.
    #[must_use]
    pub fn with_logger(&self, logger: Logger) -> Self {
        Self {
            logger: Some(logger),
            ..self.clone()
        }
    }

    /// Correlation ID, `""` when unset.
    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or_default()
    }

    /// Request ID, `""` when unset.
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or_default()
    }

    /// Stored logger, or the process-wide one.
    pub fn logger(&self) -> Logger {
        self.logger.clone().unwrap_or_else(registry::logger)
    }

    /// Stored logger (or `fallback()`), tagged with whichever IDs are set.
    pub(crate) fn scoped_logger(&self, fallback: impl FnOnce() -> Logger) -> Logger {
        let base = self.logger.clone().unwrap_or_else(fallback);
        if self.correlation_id.is_none() && self.request_id.is_none() {
            return base;
        }

        let mut builder = base.with();
        if let Some(id) = &self.correlation_id {
            builder = builder.str(CORRELATION_ID_FIELD, id.as_ref());
        }
        if let Some(id) = &self.request_id {
            builder = builder.str(REQUEST_ID_FIELD, id.as_ref());
        }
        builder.logger()
    }

    /// Logger tagged with this context's IDs.
    pub fn log(&self) -> Logger {
        self.scoped_logger(registry::logger)
    }

    /// Builder for a child of [`Context::log`].
    pub fn log_with(&self) -> LoggerBuilder {
        self.log().with()
    }

    /// Start a debug event.
    #[track_caller]
    pub fn debug(&self) -> Event {
        self.log().debug()
    }

    /// Start an info event.
    #[track_caller]
    pub fn info(&self) -> Event {
        self.log().info()
    }

    /// Start a warn event.
    #[track_caller]
    pub fn warn(&self) -> Event {
        self.log().warn()
    }

    /// Start an error event.
    #[track_caller]
    pub fn error(&self) -> Event {
        self.log().error()
    }

    /// Start an error event carrying `err`.
    #[track_caller]
    pub fn err(&self, err: impl fmt::Display) -> Event {
        self.log().err(err)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("correlation_id", &self.correlation_id())
            .field("request_id", &self.request_id())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

fn non_empty(id: &str) -> Option<Arc<str>> {
    (!id.is_empty()).then(|| Arc::from(id))
}

/// Short random ID (8 characters) for correlating related log lines.
pub fn generate_correlation_id() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

/// Full random v4 UUID for identifying one request.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// See [`Context::with_correlation_id`].
pub fn context_with_correlation_id(ctx: &Context, id: impl AsRef<str>) -> Context {
    ctx.with_correlation_id(id)
}

/// See [`Context::with_new_correlation_id`].
pub fn context_with_new_correlation_id(ctx: &Context) -> Context {
    ctx.with_new_correlation_id()
}

/// See [`Context::with_request_id`].
pub fn context_with_request_id(ctx: &Context, id: impl AsRef<str>) -> Context {
    ctx.with_request_id(id)
}

/// See [`Context::with_new_request_id`].
pub fn context_with_new_request_id(ctx: &Context) -> Context {
    ctx.with_new_request_id()
}

/// See [`Context::correlation_id`].
pub fn correlation_id_from_context(ctx: &Context) -> &str {
    ctx.correlation_id()
}

/// See [`Context::request_id`].
pub fn request_id_from_context(ctx: &Context) -> &str {
    ctx.request_id()
}

/// See [`Context::with_logger`].
pub fn context_with_logger(ctx: &Context, logger: Logger) -> Context {
    ctx.with_logger(logger)
}

/// See [`Context::logger`].
pub fn logger_from_context(ctx: &Context) -> Logger {
    ctx.logger()
}

/// See [`Context::log`].
pub fn ctx(ctx: &Context) -> Logger {
    ctx.log()
}

/// See [`Context::log_with`].
pub fn ctx_with(ctx: &Context) -> LoggerBuilder {
    ctx.log_with()
}

/// Debug event tagged with the context's IDs.
#[track_caller]
pub fn ctx_debug(ctx: &Context) -> Event {
    ctx.debug()
}

/// Info event tagged with the context's IDs.
#[track_caller]
pub fn ctx_info(ctx: &Context) -> Event {
    ctx.info()
}

/// Warn event tagged with the context's IDs.
#[track_caller]
pub fn ctx_warn(ctx: &Context) -> Event {
    ctx.warn()
}

/// Error event tagged with the context's IDs.
#[track_caller]
pub fn ctx_error(ctx: &Context) -> Event {
    ctx.error()
}

/// Error event tagged with the context's IDs and carrying `err`.
#[track_caller]
pub fn ctx_err(ctx: &Context, err: impl fmt::Display) -> Event {
    ctx.err(err)
}
