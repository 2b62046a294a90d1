//! Generic leveled-logging interface on top of the backend logger.
//!
//! [`LogHandler`] implements the [`Handler`] port so components written
//! against the generic interface end up on the same sink as everything else.
//! [`GenericLogger`] is the convenience front those components hold.

use std::sync::Arc;

use crate::domain::models::level::Level;
use crate::domain::models::record::{Attr, AttrValue, GenericLevel, Record};
use crate::domain::ports::Handler;

use super::logger::{Event, Logger};
use super::registry;

/// Map a generic level onto the backend scale.
///
/// Levels between the named ones round down; anything below `DEBUG` is
/// `trace` and anything from `ERROR` up is `error`.
pub const fn to_backend_level(level: GenericLevel) -> Level {
    match level.0 {
        i32::MIN..=-5 => Level::Trace,
        -4..=-1 => Level::Debug,
        0..=3 => Level::Info,
        4..=7 => Level::Warn,
        _ => Level::Error,
    }
}

/// Map a backend level onto the generic scale.
pub const fn from_backend_level(level: Level) -> GenericLevel {
    match level {
        Level::Trace => GenericLevel(GenericLevel::DEBUG.0 - 4),
        Level::Debug => GenericLevel::DEBUG,
        Level::Info => GenericLevel::INFO,
        Level::Warn => GenericLevel::WARN,
        Level::Error | Level::Fatal | Level::Panic => GenericLevel::ERROR,
        Level::Disabled => GenericLevel(i32::MAX),
    }
}

/// [`Handler`] that writes through a backend [`Logger`].
///
/// Keys are prefixed with the open groups, innermost group first:
/// `with_group("a").with_group("b")` writes `key` as `b.a.key`. A group
/// attribute named `request` nests its children as `request.<child>`, and a
/// group attribute with an empty key is inlined.
#[derive(Debug, Clone)]
pub struct LogHandler {
    logger: Logger,
    attrs: Arc<[Attr]>,
    groups: Arc<[String]>,
}

impl Default for LogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHandler {
    /// Handler on top of the process-wide logger.
    pub fn new() -> Self {
        Self::with_logger(registry::logger())
    }

    /// Handler on top of `logger`.
    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger,
            attrs: Arc::from(Vec::new()),
            groups: Arc::from(Vec::new()),
        }
    }

    /// Backend logger records are written to.
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    fn prefix(&self) -> String {
        self.groups
            .iter()
            .fold(String::new(), |prefix, group| format!("{group}.{prefix}"))
    }
}

fn add_attr(event: Event, prefix: &str, attr: &Attr) -> Event {
    let key = format!("{prefix}{}", attr.key);
    match &attr.value {
        AttrValue::Group(children) => {
            let nested = if attr.key.is_empty() {
                prefix.to_string()
            } else {
                format!("{key}.")
            };
            children
                .iter()
                .fold(event, |event, child| add_attr(event, &nested, child))
        }
        _ if attr.key.is_empty() => event,
        AttrValue::String(value) => event.str(key, value.as_str()),
        AttrValue::Int(value) => event.int(key, *value),
        AttrValue::Uint(value) => event.uint(key, *value),
        AttrValue::Float(value) => event.float(key, *value),
        AttrValue::Bool(value) => event.bool(key, *value),
        AttrValue::Duration(value) => event.dur(key, *value),
        AttrValue::Time(value) => event.time(key, *value),
        AttrValue::Any(value) => event.value(key, value.clone()),
    }
}

impl Handler for LogHandler {
    fn enabled(&self, level: GenericLevel) -> bool {
        self.logger.enabled(to_backend_level(level))
    }

    fn handle(&self, record: &Record) {
        let event = self.logger.log(to_backend_level(record.level));
        if !event.enabled() {
            return;
        }

        let prefix = self.prefix();
        let event = self
            .attrs
            .iter()
            .chain(&record.attrs)
            .fold(event, |event, attr| add_attr(event, &prefix, attr));
        event.msg(&record.message);
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        let mut combined = self.attrs.to_vec();
        combined.extend(attrs);
        Self {
            attrs: Arc::from(combined),
            ..self.clone()
        }
    }

    fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut groups = self.groups.to_vec();
        groups.push(name.to_string());
        Self {
            groups: Arc::from(groups),
            ..self.clone()
        }
    }
}

/// Leveled front over any [`Handler`].
#[derive(Debug, Clone)]
pub struct GenericLogger<H = LogHandler> {
    handler: H,
}

impl<H: Handler> GenericLogger<H> {
    /// Front over `handler`.
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// The underlying handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Log `message` at `level` with `attrs`.
    pub fn log(&self, level: GenericLevel, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        if !self.handler.enabled(level) {
            return;
        }
        self.handler
            .handle(&Record::new(level, message).with_attrs(attrs));
    }

    /// Log at `DEBUG`.
    pub fn debug(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(GenericLevel::DEBUG, message, attrs);
    }

    /// Log at `INFO`.
    pub fn info(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(GenericLevel::INFO, message, attrs);
    }

    /// Log at `WARN`.
    pub fn warn(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(GenericLevel::WARN, message, attrs);
    }

    /// Log at `ERROR`.
    pub fn error(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        self.log(GenericLevel::ERROR, message, attrs);
    }

    /// Child whose records all carry `attrs`.
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs.into_iter().collect()))
    }

    /// Child whose keys are nested under `name`.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self::new(self.handler.with_group(name))
    }
}

/// Generic logger on top of the process-wide logger.
pub fn new_generic_logger() -> GenericLogger {
    GenericLogger::new(LogHandler::new())
}

/// Generic logger writing to the process-wide output with its own minimum
/// level. The registry level does not apply to it, so a level below the
/// global one is honored. Unknown level names mean `info`.
pub fn new_generic_logger_with_level(level: &str) -> GenericLogger {
    GenericLogger::new(LogHandler::with_logger(
        registry::logger()
            .unbind_threshold()
            .level(Level::parse_lossy(level)),
    ))
}
