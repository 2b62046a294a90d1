//! Backend structured logger.
//!
//! A [`Logger`] is an immutable value: a shared output core (sink, format,
//! timestamp and caller switches), a minimum level, and the fields every
//! record it writes carries. Records are assembled with [`Event`] builders:
//!
//! ```
//! use cartolog::{Logger, SharedBuffer};
//!
//! let buf = SharedBuffer::new();
//! let logger = Logger::new(buf.clone()).with().component("ingest").logger();
//!
//! logger.info().str("event_id", "evt-1").uint("attempt", 2).msg("event received");
//!
//! let line = buf.contents();
//! assert!(line.contains(r#""component":"ingest""#));
//! assert!(line.contains(r#""message":"event received""#));
//! ```

use chrono::{DateTime, Local, SecondsFormat, Utc};
use console::Style;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::writer::LogWriter;
use crate::domain::models::level::{Level, LogFormat};

/// Field holding the record timestamp.
pub const TIME_FIELD: &str = "time";
/// Field holding the record level.
pub const LEVEL_FIELD: &str = "level";
/// Field holding the record message.
pub const MESSAGE_FIELD: &str = "message";
/// Field holding an attached error.
pub const ERROR_FIELD: &str = "error";
/// Field holding the `file:line` of the log call.
pub const CALLER_FIELD: &str = "caller";
/// Prefix given to user fields whose key collides with a record field.
pub const SHADOWED_FIELD_PREFIX: &str = "fields.";

const RECORD_FIELDS: [&str; 4] = [LEVEL_FIELD, TIME_FIELD, MESSAGE_FIELD, CALLER_FIELD];

fn json_key(key: &str) -> String {
    if RECORD_FIELDS.contains(&key) {
        format!("{SHADOWED_FIELD_PREFIX}{key}")
    } else {
        key.to_string()
    }
}

/// Output pipeline shared by a logger and everything derived from it.
struct LoggerCore {
    writer: LogWriter,
    format: LogFormat,
    include_timestamp: bool,
    include_caller: bool,
    color: bool,
}

impl LoggerCore {
    fn encode(
        &self,
        level: Level,
        context: &[(String, Value)],
        fields: &[(String, Value)],
        message: &str,
        caller: &Location<'_>,
    ) -> Vec<u8> {
        match self.format {
            LogFormat::Json => self.encode_json(level, context, fields, message, caller),
            LogFormat::Console => self.encode_console(level, context, fields, message, caller),
        }
    }

    fn encode_json(
        &self,
        level: Level,
        context: &[(String, Value)],
        fields: &[(String, Value)],
        message: &str,
        caller: &Location<'_>,
    ) -> Vec<u8> {
        let mut record = Map::new();
        record.insert(LEVEL_FIELD.to_string(), Value::from(level.as_str()));
        if self.include_timestamp {
            record.insert(
                TIME_FIELD.to_string(),
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        for (key, value) in context.iter().chain(fields) {
            record.insert(json_key(key), value.clone());
        }
        if self.include_caller {
            record.insert(CALLER_FIELD.to_string(), Value::from(format_caller(caller)));
        }
        if !message.is_empty() {
            record.insert(MESSAGE_FIELD.to_string(), Value::from(message));
        }

        let mut line = serde_json::to_vec(&Value::Object(record)).unwrap_or_default();
        line.push(b'\n');
        line
    }

    fn encode_console(
        &self,
        level: Level,
        context: &[(String, Value)],
        fields: &[(String, Value)],
        message: &str,
        caller: &Location<'_>,
    ) -> Vec<u8> {
        let mut parts: Vec<String> = Vec::with_capacity(4 + context.len() + fields.len());
        if self.include_timestamp {
            parts.push(Local::now().format("%H:%M:%S").to_string());
        }
        parts.push(self.level_tag(level));
        if self.include_caller {
            parts.push(format!("{} >", format_caller(caller)));
        }
        if !message.is_empty() {
            parts.push(message.to_string());
        }
        for (key, value) in context.iter().chain(fields) {
            parts.push(format!("{key}={}", console_value(value)));
        }

        let mut line = parts.join(" ").into_bytes();
        line.push(b'\n');
        line
    }

    fn level_tag(&self, level: Level) -> String {
        let tag = level.abbrev();
        if !self.color {
            return tag.to_string();
        }
        let style = match level {
            Level::Trace => Style::new().magenta(),
            Level::Debug => Style::new().yellow(),
            Level::Info => Style::new().green(),
            Level::Warn => Style::new().red(),
            Level::Error | Level::Fatal | Level::Panic => Style::new().red().bold(),
            Level::Disabled => Style::new(),
        };
        style.force_styling(true).apply_to(tag).to_string()
    }
}

fn wants_color(writer: &LogWriter, format: LogFormat) -> bool {
    format == LogFormat::Console && writer.is_stderr() && console::colors_enabled_stderr()
}

fn format_caller(caller: &Location<'_>) -> String {
    format!("{}:{}", caller.file(), caller.line())
}

fn console_value(value: &Value) -> String {
    match value {
        Value::String(s)
            if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '=' || c == '"') =>
        {
            format!("{s:?}")
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn float_value(value: f64) -> Value {
    if value.is_finite() {
        Value::from(value)
    } else {
        Value::from(value.to_string())
    }
}

/// Field-accumulating targets: events and logger builders.
trait FieldTarget {
    fn accepts(&self) -> bool;
    fn push_field(&mut self, key: String, value: Value);
}

#[allow(clippy::cast_precision_loss)]
fn duration_millis(value: Duration) -> f64 {
    value.as_secs() as f64 * 1000.0 + f64::from(value.subsec_nanos()) / 1_000_000.0
}

/// Typed field setters shared by [`Event`], [`FatalEvent`], [`PanicEvent`]
/// and [`LoggerBuilder`]. Arguments are only converted when the target
/// accepts fields, so disabled events stay cheap.
macro_rules! field_setters {
    () => {
        /// Add a string field.
        #[must_use]
        pub fn str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            if self.accepts() {
                self.push_field(key.into(), Value::String(value.into()));
            }
            self
        }

        /// Add a signed integer field.
        #[must_use]
        pub fn int(mut self, key: impl Into<String>, value: i64) -> Self {
            if self.accepts() {
                self.push_field(key.into(), Value::from(value));
            }
            self
        }

        /// Add an unsigned integer field.
        #[must_use]
        pub fn uint(mut self, key: impl Into<String>, value: u64) -> Self {
            if self.accepts() {
                self.push_field(key.into(), Value::from(value));
            }
            self
        }

        /// Add a float field. Non-finite values are written as strings.
        #[must_use]
        pub fn float(mut self, key: impl Into<String>, value: f64) -> Self {
            if self.accepts() {
                self.push_field(key.into(), float_value(value));
            }
            self
        }

        /// Add a boolean field.
        #[must_use]
        pub fn bool(mut self, key: impl Into<String>, value: bool) -> Self {
            if self.accepts() {
                self.push_field(key.into(), Value::Bool(value));
            }
            self
        }

        /// Add a duration field, in milliseconds.
        #[must_use]
        pub fn dur(mut self, key: impl Into<String>, value: Duration) -> Self {
            if self.accepts() {
                self.push_field(key.into(), float_value(duration_millis(value)));
            }
            self
        }

        /// Add an RFC 3339 timestamp field.
        #[must_use]
        pub fn time(mut self, key: impl Into<String>, value: DateTime<Utc>) -> Self {
            if self.accepts() {
                self.push_field(
                    key.into(),
                    Value::from(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                );
            }
            self
        }

        /// Add any serializable value. Serialization failures are recorded
        /// as the serializer's error string.
        #[must_use]
        pub fn any<T: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
            if self.accepts() {
                let value = serde_json::to_value(value)
                    .unwrap_or_else(|e| Value::from(format!("!ERROR: {e}")));
                self.push_field(key.into(), value);
            }
            self
        }

        /// Add a raw JSON value.
        #[must_use]
        pub fn value(mut self, key: impl Into<String>, value: Value) -> Self {
            if self.accepts() {
                self.push_field(key.into(), value);
            }
            self
        }

        /// Attach an error under the conventional `error` field.
        #[must_use]
        pub fn err(mut self, err: impl fmt::Display) -> Self {
            if self.accepts() {
                self.push_field(ERROR_FIELD.to_string(), Value::from(err.to_string()));
            }
            self
        }
    };
}

/// Structured logger value.
///
/// Cheap to clone; clones and derived loggers share the output pipeline.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
    level: Level,
    fields: Arc<[(String, Value)]>,
    threshold: Option<Arc<AtomicU8>>,
}

impl Logger {
    /// JSON logger writing to `writer` with timestamps, without caller
    /// information, accepting every level.
    pub fn new(writer: impl Into<LogWriter>) -> Self {
        Self::from_parts(writer.into(), LogFormat::Json, true, false)
    }

    /// Logger that never writes anything.
    pub fn disabled() -> Self {
        Self::new(LogWriter::new(io::sink())).level(Level::Disabled)
    }

    pub(crate) fn from_parts(
        writer: LogWriter,
        format: LogFormat,
        include_timestamp: bool,
        include_caller: bool,
    ) -> Self {
        let color = wants_color(&writer, format);
        Self {
            core: Arc::new(LoggerCore {
                writer,
                format,
                include_timestamp,
                include_caller,
                color,
            }),
            level: Level::Trace,
            fields: Arc::from(Vec::new()),
            threshold: None,
        }
    }

    fn with_core(&self, core: LoggerCore) -> Self {
        Self {
            core: Arc::new(core),
            ..self.clone()
        }
    }

    /// Copy of this logger using another output format.
    #[must_use]
    pub fn with_format(&self, format: LogFormat) -> Self {
        self.with_core(LoggerCore {
            writer: self.core.writer.clone(),
            format,
            include_timestamp: self.core.include_timestamp,
            include_caller: self.core.include_caller,
            color: wants_color(&self.core.writer, format),
        })
    }

    /// Copy of this logger with timestamps switched on or off.
    #[must_use]
    pub fn with_timestamp(&self, enabled: bool) -> Self {
        self.with_core(LoggerCore {
            writer: self.core.writer.clone(),
            format: self.core.format,
            include_timestamp: enabled,
            include_caller: self.core.include_caller,
            color: self.core.color,
        })
    }

    /// Copy of this logger with caller locations switched on or off.
    #[must_use]
    pub fn with_caller(&self, enabled: bool) -> Self {
        self.with_core(LoggerCore {
            writer: self.core.writer.clone(),
            format: self.core.format,
            include_timestamp: self.core.include_timestamp,
            include_caller: enabled,
            color: self.core.color,
        })
    }

    /// Copy of this logger with another minimum level.
    #[must_use]
    pub fn level(&self, level: Level) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// Minimum level of this logger (not counting any registry threshold).
    pub const fn get_level(&self) -> Level {
        self.level
    }

    /// Output format of this logger.
    pub fn format(&self) -> LogFormat {
        self.core.format
    }

    pub(crate) fn bind_threshold(mut self, threshold: Arc<AtomicU8>) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Copy of this logger gated only by its own level.
    pub(crate) fn unbind_threshold(mut self) -> Self {
        self.threshold = None;
        self
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::Disabled
            && level >= self.level
            && self
                .threshold
                .as_ref()
                .is_none_or(|t| level.to_u8() >= t.load(Ordering::Relaxed))
    }

    /// Detached builder for a child logger carrying extra fields.
    pub fn with(&self) -> LoggerBuilder {
        LoggerBuilder {
            logger: self.clone(),
            fields: Vec::new(),
        }
    }

    /// Child logger tagged with a `component` field.
    #[must_use]
    pub fn with_component(&self, component: &str) -> Self {
        self.with().component(component).logger()
    }

    /// Start an event at `level`.
    #[track_caller]
    pub fn log(&self, level: Level) -> Event {
        let caller = Location::caller();
        if !self.enabled(level) {
            return Event { inner: None };
        }
        Event {
            inner: Some(EventInner::new(self.clone(), level, caller)),
        }
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

    /// Start an error event with `err` attached under the `error` field.
    #[track_caller]
    pub fn err(&self, err: impl fmt::Display) -> Event {
        self.log(Level::Error).err(err)
    }

    /// Start a fatal event. **Finishing it terminates the process** with exit
    /// status 1 once the record has been written. Fatal records bypass level
    /// gating so that termination is never silent.
    #[track_caller]
    pub fn fatal(&self) -> FatalEvent {
        FatalEvent(EventInner::new(self.clone(), Level::Fatal, Location::caller()))
    }

    /// Start a panic event. **Finishing it panics** once the record has been
    /// written. Panic records bypass level gating.
    #[track_caller]
    pub fn panic(&self) -> PanicEvent {
        PanicEvent(EventInner::new(self.clone(), Level::Panic, Location::caller()))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogWriter::stderr())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("format", &self.core.format)
            .field("timestamp", &self.core.include_timestamp)
            .field("caller", &self.core.include_caller)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

struct EventInner {
    logger: Logger,
    level: Level,
    fields: Vec<(String, Value)>,
    caller: &'static Location<'static>,
}

impl EventInner {
    fn new(logger: Logger, level: Level, caller: &'static Location<'static>) -> Self {
        Self {
            logger,
            level,
            fields: Vec::new(),
            caller,
        }
    }

    fn write(&self, message: &str) {
        let core = &self.logger.core;
        let line = core.encode(
            self.level,
            &self.logger.fields,
            &self.fields,
            message,
            self.caller,
        );
        core.writer.write_record(&line);
    }
}

/// One pending record. Nothing is written until [`Event::msg`] or
/// [`Event::send`] is called; a disabled event ignores every setter.
#[must_use = "an event is only written when `msg` or `send` is called"]
pub struct Event {
    inner: Option<EventInner>,
}

impl FieldTarget for Event {
    fn accepts(&self) -> bool {
        self.inner.is_some()
    }

    fn push_field(&mut self, key: String, value: Value) {
        if let Some(inner) = self.inner.as_mut() {
            inner.fields.push((key, value));
        }
    }
}

impl Event {
    field_setters!();

    /// Whether this event will be written.
    pub const fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Write the record with `message`.
    pub fn msg(self, message: impl AsRef<str>) {
        if let Some(inner) = self.inner {
            inner.write(message.as_ref());
        }
    }

    /// Write the record without a message.
    pub fn send(self) {
        self.msg("");
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.inner.as_ref().map(|i| i.level))
            .finish_non_exhaustive()
    }
}

/// Pending fatal record. [`FatalEvent::msg`] writes it, then exits the
/// process; it never returns.
#[must_use = "a fatal event is only written (and the process stopped) by `msg`"]
pub struct FatalEvent(EventInner);

impl FieldTarget for FatalEvent {
    fn accepts(&self) -> bool {
        true
    }

    fn push_field(&mut self, key: String, value: Value) {
        self.0.fields.push((key, value));
    }
}

impl FatalEvent {
    field_setters!();

    /// Write the record, then terminate the process with exit status 1.
    pub fn msg(self, message: impl AsRef<str>) -> ! {
        self.0.write(message.as_ref());
        std::process::exit(1)
    }
}

/// Pending panic record. [`PanicEvent::msg`] writes it, then panics with the
/// message; it never returns.
#[must_use = "a panic event is only written (and the panic raised) by `msg`"]
pub struct PanicEvent(EventInner);

impl FieldTarget for PanicEvent {
    fn accepts(&self) -> bool {
        true
    }

    fn push_field(&mut self, key: String, value: Value) {
        self.0.fields.push((key, value));
    }
}

impl PanicEvent {
    field_setters!();

    /// Write the record, then panic with `message`.
    pub fn msg(self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        self.0.write(message);
        panic!("{message}")
    }
}

/// Detached accumulator of fields for a child logger.
///
/// Building never touches global state: the child inherits its parent's
/// output, level, timestamp and caller behavior.
#[must_use = "call `logger()` to obtain the child logger"]
pub struct LoggerBuilder {
    logger: Logger,
    fields: Vec<(String, Value)>,
}

impl FieldTarget for LoggerBuilder {
    fn accepts(&self) -> bool {
        true
    }

    fn push_field(&mut self, key: String, value: Value) {
        self.fields.push((key, value));
    }
}

impl LoggerBuilder {
    field_setters!();

    /// Add a `component` field.
    pub fn component(self, component: impl Into<String>) -> Self {
        self.str("component", component)
    }

    /// Add a `service` field.
    pub fn service(self, service: impl Into<String>) -> Self {
        self.str("service", service)
    }

    /// Finish the child logger.
    pub fn logger(self) -> Logger {
        if self.fields.is_empty() {
            return self.logger;
        }
        let mut fields = self.logger.fields.to_vec();
        fields.extend(self.fields);
        Logger {
            fields: Arc::from(fields),
            ..self.logger
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("logger", &self.logger)
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::writer::SharedBuffer;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).expect("record should be valid JSON")
    }

    #[test]
    fn test_json_record_shape() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .info()
            .str("key1", "value1")
            .int("key2", 42)
            .msg("test message");

        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        let record = parse(&lines[0]);
        assert_eq!(record[LEVEL_FIELD], "info");
        assert_eq!(record[MESSAGE_FIELD], "test message");
        assert_eq!(record["key1"], "value1");
        assert_eq!(record["key2"], 42);
        assert!(record[TIME_FIELD].is_string());
        assert!(record.get(CALLER_FIELD).is_none());
    }

    #[test]
    fn test_field_order_is_stable() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .with_timestamp(false)
            .with()
            .str("service", "api")
            .logger()
            .warn()
            .str("b", "2")
            .str("a", "1")
            .msg("ordered");

        assert_eq!(
            buf.lines()[0],
            r#"{"level":"warn","service":"api","b":"2","a":"1","message":"ordered"}"#
        );
    }

    #[test]
    fn test_user_fields_cannot_replace_record_fields() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .with_caller(true)
            .with()
            .str("message", "from context")
            .logger()
            .error()
            .str("level", "debug")
            .str("time", "yesterday")
            .str("caller", "elsewhere.rs:1")
            .msg("disk failure");

        let record = parse(&buf.lines()[0]);
        assert_eq!(record[LEVEL_FIELD], "error");
        assert_ne!(record[TIME_FIELD], "yesterday");
        assert_eq!(record[MESSAGE_FIELD], "disk failure");
        assert!(record[CALLER_FIELD].as_str().unwrap().contains("logger.rs:"));
        assert_eq!(record["fields.level"], "debug");
        assert_eq!(record["fields.time"], "yesterday");
        assert_eq!(record["fields.caller"], "elsewhere.rs:1");
        assert_eq!(record["fields.message"], "from context");
    }

    #[test]
    fn test_shadowed_fields_without_timestamp() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .with_timestamp(false)
            .info()
            .str("time", "later")
            .msg("tick");

        assert_eq!(
            buf.lines()[0],
            r#"{"level":"info","fields.time":"later","message":"tick"}"#
        );
    }

    #[test]
    fn test_typed_fields() {
        let buf = SharedBuffer::new();
        let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Logger::new(buf.clone())
            .info()
            .uint("uint", 100)
            .float("float", 2.5)
            .bool("flag", true)
            .dur("elapsed", Duration::from_millis(1500))
            .time("created", created)
            .any("data", &std::collections::BTreeMap::from([("a", 1)]))
            .float("nan", f64::NAN)
            .send();

        let record = parse(&buf.lines()[0]);
        assert_eq!(record["uint"], 100);
        assert_eq!(record["float"], 2.5);
        assert_eq!(record["flag"], true);
        assert_eq!(record["elapsed"], 1500.0);
        assert_eq!(record["created"], "2024-01-01T00:00:00Z");
        assert_eq!(record["data"]["a"], 1);
        assert_eq!(record["nan"], "NaN");
        assert!(record.get(MESSAGE_FIELD).is_none());
    }

    #[test]
    fn test_err_sets_error_field() {
        let buf = SharedBuffer::new();
        let err = io::Error::other("database connection failed");
        Logger::new(buf.clone()).err(&err).msg("query failed");

        let record = parse(&buf.lines()[0]);
        assert_eq!(record[LEVEL_FIELD], "error");
        assert_eq!(record[ERROR_FIELD], "database connection failed");
    }

    #[test]
    fn test_level_filter() {
        let buf = SharedBuffer::new();
        let logger = Logger::new(buf.clone()).level(Level::Info);

        logger.debug().msg("debug message");
        assert!(buf.contents().is_empty());

        logger.info().msg("info message");
        assert!(buf.contents().contains("info message"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = Logger::disabled();
        for level in Level::ALL {
            assert!(!logger.enabled(level));
        }
        assert!(!logger.error().enabled());
    }

    #[test]
    fn test_disabled_level_never_emits() {
        let logger = Logger::new(SharedBuffer::new());
        assert!(!logger.enabled(Level::Disabled));
        assert!(logger.enabled(Level::Trace));
    }

    #[test]
    fn test_threshold_gates_bound_logger() {
        let buf = SharedBuffer::new();
        let threshold = Arc::new(AtomicU8::new(Level::Warn.to_u8()));
        let logger = Logger::new(buf.clone()).bind_threshold(Arc::clone(&threshold));

        logger.info().msg("hidden");
        logger.warn().msg("shown");
        threshold.store(Level::Trace.to_u8(), Ordering::Relaxed);
        logger.info().msg("now shown");

        let contents = buf.contents();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("shown"));
        assert!(contents.contains("now shown"));
    }

    #[test]
    fn test_unbound_logger_ignores_threshold() {
        let buf = SharedBuffer::new();
        let threshold = Arc::new(AtomicU8::new(Level::Info.to_u8()));
        let bound = Logger::new(buf.clone())
            .bind_threshold(threshold)
            .level(Level::Debug);
        assert!(!bound.enabled(Level::Debug));

        let own = bound.unbind_threshold();
        assert!(own.enabled(Level::Debug));
        assert!(!own.enabled(Level::Trace));
        own.debug().msg("visible");
        assert!(buf.contents().contains("visible"));
    }

    #[test]
    fn test_builder_does_not_touch_parent() {
        let buf = SharedBuffer::new();
        let parent = Logger::new(buf.clone());
        let child = parent.with().component("consumer").logger();

        parent.info().msg("from parent");
        child.info().msg("from child");

        let lines = buf.lines();
        assert!(!lines[0].contains("component"));
        assert!(lines[1].contains(r#""component":"consumer""#));
    }

    #[test]
    fn test_caller_field() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone()).with_caller(true).info().msg("where");

        let record = parse(&buf.lines()[0]);
        let caller = record[CALLER_FIELD].as_str().unwrap();
        assert!(caller.contains("logger.rs:"), "unexpected caller {caller}");
    }

    #[test]
    fn test_console_format() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .with_format(LogFormat::Console)
            .with_timestamp(false)
            .warn()
            .str("key", "value")
            .str("path", "has space")
            .int("count", 3)
            .msg("warning message");

        assert_eq!(
            buf.lines()[0],
            r#"WRN warning message key=value path="has space" count=3"#
        );
    }

    #[test]
    fn test_console_format_with_timestamp() {
        let buf = SharedBuffer::new();
        Logger::new(buf.clone())
            .with_format(LogFormat::Console)
            .info()
            .msg("tick");

        let line = &buf.lines()[0];
        let (time, rest) = line.split_once(' ').unwrap();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
        assert_eq!(rest, "INF tick");
    }

    #[test]
    fn test_panic_event_emits_before_panicking() {
        let buf = SharedBuffer::new();
        let logger = Logger::new(buf.clone()).level(Level::Disabled);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic().str("reason", "invariant").msg("boom");
        }));

        assert!(result.is_err());
        let record = parse(&buf.lines()[0]);
        assert_eq!(record[LEVEL_FIELD], "panic");
        assert_eq!(record[MESSAGE_FIELD], "boom");
        assert_eq!(record["reason"], "invariant");
    }
}
