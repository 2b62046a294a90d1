//! Bridge from the `tracing` ecosystem into a [`Handler`].
//!
//! Third-party crates that instrument themselves with `tracing` end up on the
//! same sink as the rest of the application once the bridge is installed.
//! Span names become groups (root span first) and span fields are attached
//! under their span's group.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanRecord};
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::{LookupSpan, SpanRef};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::level::Level;
use crate::domain::models::record::{Attr, GenericLevel, Record};
use crate::domain::ports::Handler;

use super::adapter::{from_backend_level, LogHandler};
use super::registry;

const MESSAGE_FIELD: &str = "message";

/// `tracing_subscriber` layer forwarding every event to a [`Handler`].
#[derive(Debug, Clone)]
pub struct TracingBridge<H> {
    handler: H,
}

impl<H: Handler> TracingBridge<H> {
    /// Bridge into `handler`.
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }
}

/// Fields recorded on a span, stored in the span's extensions.
struct SpanFields(Vec<Attr>);

/// Collects event or span fields as typed attributes.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    attrs: Vec<Attr>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = value.to_string();
        } else {
            self.attrs.push(Attr::string(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::uint(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attrs.push(Attr::string(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = format!("{value:?}");
        } else {
            self.attrs.push(Attr::string(field.name(), format!("{value:?}")));
        }
    }
}

fn generic_level(level: tracing::Level) -> GenericLevel {
    let level = match level {
        tracing::Level::TRACE => Level::Trace,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    };
    from_backend_level(level)
}

fn level_filter(level: Level) -> LevelFilter {
    match level {
        Level::Trace => LevelFilter::TRACE,
        Level::Debug => LevelFilter::DEBUG,
        Level::Info => LevelFilter::INFO,
        Level::Warn => LevelFilter::WARN,
        Level::Error | Level::Fatal | Level::Panic => LevelFilter::ERROR,
        Level::Disabled => LevelFilter::OFF,
    }
}

fn in_span<H, S>(handler: &H, span: &SpanRef<'_, S>) -> H
where
    H: Handler,
    S: for<'a> LookupSpan<'a>,
{
    let handler = handler.with_group(span.name());
    let extensions = span.extensions();
    match extensions.get::<SpanFields>() {
        Some(fields) if !fields.0.is_empty() => handler.with_attrs(fields.0.clone()),
        _ => handler,
    }
}

impl<S, H> Layer<S> for TracingBridge<H>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    H: Handler + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: LayerContext<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.attrs));
    }

    fn on_record(&self, id: &Id, values: &SpanRecord<'_>, ctx: LayerContext<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => fields.0.extend(visitor.attrs),
            None => extensions.insert(SpanFields(visitor.attrs)),
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: LayerContext<'_, S>) {
        let level = generic_level(*event.metadata().level());
        if !self.handler.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let record = Record::new(level, visitor.message).with_attrs(visitor.attrs);

        let mut spans = ctx
            .event_scope(event)
            .into_iter()
            .flat_map(|scope| scope.from_root());
        let Some(root) = spans.next() else {
            self.handler.handle(&record);
            return;
        };
        let handler = spans.fold(in_span(&self.handler, &root), |handler, span| {
            in_span(&handler, &span)
        });
        handler.handle(&record);
    }
}

/// Route `tracing` events from every crate through the process-wide logger.
///
/// Filtering follows `RUST_LOG` when set and the registry's current level
/// otherwise. Call after [`init`](crate::init): the bridge keeps the output
/// configured at install time. Returns `false` when another global
/// subscriber is already installed.
pub fn install_tracing_bridge() -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(registry::get_level()).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(TracingBridge::new(LogHandler::new()).with_filter(filter))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::logger::Logger;
    use crate::infrastructure::logging::writer::SharedBuffer;
    use serde_json::Value;

    fn with_bridge(level: Level, f: impl FnOnce()) -> Vec<Value> {
        let buf = SharedBuffer::new();
        let handler = LogHandler::with_logger(Logger::new(buf.clone()).level(level));
        let subscriber = tracing_subscriber::registry().with(TracingBridge::new(handler));
        tracing::subscriber::with_default(subscriber, f);

        buf.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_fields_are_typed() {
        let records = with_bridge(Level::Trace, || {
            tracing::info!(count = 3, ratio = 0.5, ok = true, volume = "disk", "scan complete");
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "info");
        assert_eq!(record["message"], "scan complete");
        assert_eq!(record["count"], 3);
        assert_eq!(record["ratio"], 0.5);
        assert_eq!(record["ok"], true);
        assert_eq!(record["volume"], "disk");
    }

    #[test]
    fn test_levels_map_and_filter() {
        let records = with_bridge(Level::Info, || {
            tracing::trace!("hidden");
            tracing::debug!("hidden");
            tracing::info!("shown");
            tracing::warn!("shown");
            tracing::error!("shown");
        });

        let levels: Vec<&str> = records.iter().map(|r| r["level"].as_str().unwrap()).collect();
        assert_eq!(levels, vec!["info", "warn", "error"]);
    }

    #[test]
    fn test_trace_events_reach_trace_loggers() {
        let records = with_bridge(Level::Trace, || tracing::trace!("fine-grained"));
        assert_eq!(records[0]["level"], "trace");
    }

    #[test]
    fn test_spans_become_groups() {
        let records = with_bridge(Level::Trace, || {
            let span = tracing::info_span!("request", method = "GET");
            let _guard = span.enter();
            tracing::info!(status = 200, "served");
        });

        let record = &records[0];
        assert_eq!(record["request.method"], "GET");
        assert_eq!(record["request.status"], 200);
        assert_eq!(record["message"], "served");
    }

    #[test]
    fn test_recorded_span_fields_are_kept() {
        let records = with_bridge(Level::Trace, || {
            let span = tracing::info_span!("job", id = tracing::field::Empty);
            span.record("id", 7);
            let _guard = span.enter();
            tracing::info!("ran");
        });

        assert_eq!(records[0]["job.id"], 7);
    }

    #[test]
    fn test_level_filter_from_backend_level() {
        assert_eq!(level_filter(Level::Debug), LevelFilter::DEBUG);
        assert_eq!(level_filter(Level::Fatal), LevelFilter::ERROR);
        assert_eq!(level_filter(Level::Disabled), LevelFilter::OFF);
    }
}
