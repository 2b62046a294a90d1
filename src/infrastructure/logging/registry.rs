//! Process-wide logger registry.
//!
//! A [`LoggerRegistry`] owns the active [`Logger`] and the minimum level every
//! logger it hands out is gated on. Applications normally go through the
//! default instance with the free functions of this module:
//!
//! ```
//! use cartolog::{LoggerConfig, SharedBuffer};
//!
//! let buf = SharedBuffer::new();
//! cartolog::init(LoggerConfig::with_output(buf.clone()));
//! cartolog::with_component("scanner").info().int("files", 12).msg("scan finished");
//!
//! assert!(buf.contents().contains("\"component\":\"scanner\""));
//! ```
//!
//! Tests and embedders that need isolation construct their own registry.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::config::LoggerConfig;
use super::context::Context;
use super::logger::{Event, FatalEvent, Logger, LoggerBuilder, PanicEvent};
use crate::domain::models::level::Level;
use crate::infrastructure::config::ConfigLoader;

/// Owner of one active logger and its level threshold.
#[derive(Debug)]
pub struct LoggerRegistry {
    logger: RwLock<Logger>,
    threshold: Arc<AtomicU8>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    /// Registry holding a default logger: JSON to stderr at `info`.
    pub fn new() -> Self {
        let threshold = Arc::new(AtomicU8::new(Level::Info.to_u8()));
        let logger = Self::build(LoggerConfig::default()).bind_threshold(Arc::clone(&threshold));
        Self {
            logger: RwLock::new(logger),
            threshold,
        }
    }

    fn build(config: LoggerConfig) -> Logger {
        Logger::from_parts(
            config.output.clone(),
            config.parsed_format(),
            config.include_timestamp,
            config.include_caller,
        )
    }

    /// Install a logger built from `config`.
    ///
    /// Empty fields take their defaults and unknown level names resolve to
    /// `info`. When fuzz mode is switched on in the environment the effective
    /// level is forced to `fatal`. Never fails; safe to call repeatedly.
    pub fn init(&self, config: LoggerConfig) {
        let config = config.normalized();
        let level = if ConfigLoader::fuzz_mode() {
            Level::Fatal
        } else {
            config.parsed_level()
        };

        let logger = Self::build(config).bind_threshold(Arc::clone(&self.threshold));
        let mut slot = self.logger.write().unwrap_or_else(PoisonError::into_inner);
        self.threshold.store(level.to_u8(), Ordering::Relaxed);
        *slot = logger;
    }

    /// [`LoggerRegistry::init`] with the configuration read from `LOG_*`
    /// environment variables.
    pub fn init_from_env(&self) {
        self.init(ConfigLoader::from_env());
    }

    /// The active logger.
    pub fn logger(&self) -> Logger {
        self.logger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the active logger. The registry threshold keeps applying to it.
    pub fn set_logger(&self, logger: Logger) {
        let logger = logger.bind_threshold(Arc::clone(&self.threshold));
        *self.logger.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    /// Builder for a child of the active logger.
    pub fn with(&self) -> LoggerBuilder {
        self.logger().with()
    }

    /// Child logger tagged with a `component` field.
    pub fn with_component(&self, component: &str) -> Logger {
        self.logger().with_component(component)
    }

    /// Child logger tagged with a `service` field.
    pub fn with_service(&self, service: &str) -> Logger {
        self.with().service(service).logger()
    }

    /// Logger for `ctx`, resolved against this registry.
    pub fn ctx(&self, ctx: &Context) -> Logger {
        ctx.scoped_logger(|| self.logger())
    }

    /// Start an event at `level`.
    #[track_caller]
    pub fn log(&self, level: Level) -> Event {
        self.logger().log(level)
    }

    /// Start a trace event.
    #[track_caller]
    pub fn trace(&self) -> Event {
        self.log(Level::Trace)
    }

    /// Start a debug event.
    #[track_caller]
    pub fn debug(&self) -> Event {
        self.log(Level::Debug)
    }

    /// Start an info event.
    #[track_caller]
    pub fn info(&self) -> Event {
        self.log(Level::Info)
    }

    /// Start a warn event.
    #[track_caller]
    pub fn warn(&self) -> Event {
        self.log(Level::Warn)
    }

    /// Start an error event.
    #[track_caller]
    pub fn error(&self) -> Event {
        self.log(Level::Error)
    }

    /// Start an error event carrying `err`.
    #[track_caller]
    pub fn err(&self, err: impl std::fmt::Display) -> Event {
        self.log(Level::Error).err(err)
    }

    /// Start a fatal event; finishing it exits the process.
    #[track_caller]
    pub fn fatal(&self) -> FatalEvent {
        self.logger().fatal()
    }

    /// Start a panic event; finishing it panics.
    #[track_caller]
    pub fn panic(&self) -> PanicEvent {
        self.logger().panic()
    }

    /// Current threshold.
    pub fn get_level(&self) -> Level {
        Level::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Change the threshold for every logger handed out by this registry,
    /// including ones already held by callers.
    pub fn set_level(&self, level: Level) {
        self.threshold.store(level.to_u8(), Ordering::Relaxed);
    }

    /// [`LoggerRegistry::set_level`] from a level name; unknown names mean
    /// `info`.
    pub fn set_level_string(&self, level: &str) {
        self.set_level(Level::parse_lossy(level));
    }

    /// Whether records at `level` pass the threshold.
    pub fn is_level_enabled(&self, level: Level) -> bool {
        level != Level::Disabled && level >= self.get_level()
    }
}

static GLOBAL: LazyLock<LoggerRegistry> = LazyLock::new(LoggerRegistry::new);

/// The process-wide registry behind the free functions.
pub fn global() -> &'static LoggerRegistry {
    &GLOBAL
}

/// Configure the process-wide logger. See [`LoggerRegistry::init`].
pub fn init(config: LoggerConfig) {
    GLOBAL.init(config);
}

/// Configure the process-wide logger from `LOG_*` environment variables.
pub fn init_from_env() {
    GLOBAL.init_from_env();
}

/// The process-wide logger.
pub fn logger() -> Logger {
    GLOBAL.logger()
}

/// Replace the process-wide logger.
pub fn set_logger(logger: Logger) {
    GLOBAL.set_logger(logger);
}

/// Builder for a child of the process-wide logger.
pub fn with() -> LoggerBuilder {
    GLOBAL.with()
}

/// Child of the process-wide logger tagged with a `component` field.
pub fn with_component(component: &str) -> Logger {
    GLOBAL.with_component(component)
}

/// Child of the process-wide logger tagged with a `service` field.
pub fn with_service(service: &str) -> Logger {
    GLOBAL.with_service(service)
}

/// Start a trace event on the process-wide logger.
#[track_caller]
pub fn trace() -> Event {
    GLOBAL.trace()
}

/// Start a debug event on the process-wide logger.
#[track_caller]
pub fn debug() -> Event {
    GLOBAL.debug()
}

/// Start an info event on the process-wide logger.
#[track_caller]
pub fn info() -> Event {
    GLOBAL.info()
}

/// Start a warn event on the process-wide logger.
#[track_caller]
pub fn warn() -> Event {
    GLOBAL.warn()
}

/// Start an error event on the process-wide logger.
#[track_caller]
pub fn error() -> Event {
    GLOBAL.error()
}

/// Start an error event carrying `err` on the process-wide logger.
#[track_caller]
pub fn err(err: impl std::fmt::Display) -> Event {
    GLOBAL.err(err)
}

/// Start a fatal event on the process-wide logger.
#[track_caller]
pub fn fatal() -> FatalEvent {
    GLOBAL.fatal()
}

/// Start a panic event on the process-wide logger.
#[track_caller]
pub fn panic() -> PanicEvent {
    GLOBAL.panic()
}

/// Threshold of the process-wide registry.
pub fn get_level() -> Level {
    GLOBAL.get_level()
}

/// Set the threshold of the process-wide registry.
pub fn set_level(level: Level) {
    GLOBAL.set_level(level);
}

/// Set the threshold of the process-wide registry from a level name.
pub fn set_level_string(level: &str) {
    GLOBAL.set_level_string(level);
}

/// Whether the process-wide threshold lets `level` through.
pub fn is_level_enabled(level: Level) -> bool {
    GLOBAL.is_level_enabled(level)
}
