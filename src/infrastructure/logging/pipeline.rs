//! Logging vocabulary of the event-ingestion pipeline.
//!
//! Every pipeline stage logs through [`EventLogger`] so records share the
//! `eventprocessor` component and stable message texts. Without the `events`
//! feature the same API exists and every call compiles to nothing.

use std::fmt;
use std::time::Duration;

use super::context::Context;

/// Component name carried by every pipeline record.
pub const COMPONENT: &str = "eventprocessor";

/// Domain logging calls for the event pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLogger;

#[cfg(feature = "events")]
#[allow(clippy::unused_self)]
impl EventLogger {
    /// Create the pipeline logger.
    pub const fn new() -> Self {
        Self
    }

    fn logger(ctx: &Context) -> super::logger::Logger {
        ctx.log().with_component(COMPONENT)
    }

    /// An event arrived from a media server.
    pub fn log_event_received(&self, ctx: &Context, event_id: &str, source: &str, media_type: &str) {
        Self::logger(ctx)
            .info()
            .str("event_id", event_id)
            .str("source", source)
            .str("media_type", media_type)
            .msg("event received");
    }

    /// An event went through the pipeline.
    pub fn log_event_processed(&self, ctx: &Context, event_id: &str, duration: Duration) {
        Self::logger(ctx)
            .info()
            .str("event_id", event_id)
            .dur("duration_ms", duration)
            .msg("event processed");
    }

    /// Processing an event failed.
    pub fn log_event_failed(&self, ctx: &Context, event_id: &str, err: impl fmt::Display) {
        Self::logger(ctx)
            .error()
            .str("event_id", event_id)
            .err(err)
            .msg("event processing failed");
    }

    /// An event was dropped as a duplicate.
    pub fn log_duplicate(&self, ctx: &Context, event_id: &str, reason: &str) {
        Self::logger(ctx)
            .debug()
            .str("event_id", event_id)
            .str("reason", reason)
            .msg("duplicate event skipped");
    }

    /// An event was moved to the dead-letter queue.
    pub fn log_dlq_entry(&self, ctx: &Context, event_id: &str, err: impl fmt::Display, retry_count: u32) {
        Self::logger(ctx)
            .warn()
            .str("event_id", event_id)
            .err(err)
            .uint("retry_count", u64::from(retry_count))
            .msg("event sent to DLQ");
    }

    /// A batch was flushed to storage.
    pub fn log_batch_flush(&self, ctx: &Context, event_count: usize, duration: Duration) {
        Self::logger(ctx)
            .info()
            .uint("event_count", event_count as u64)
            .dur("duration_ms", duration)
            .msg("batch flush completed");
    }

    /// An event was published on the message bus.
    pub fn log_publish(&self, ctx: &Context, subject: &str, event_id: &str) {
        Self::logger(ctx)
            .debug()
            .str("subject", subject)
            .str("event_id", event_id)
            .msg("event published");
    }

    /// A subscription started.
    pub fn log_subscription_start(&self, ctx: &Context, subject: &str) {
        Self::logger(ctx)
            .info()
            .str("subject", subject)
            .msg("subscription started");
    }

    /// A subscription stopped.
    pub fn log_subscription_stop(&self, ctx: &Context, subject: &str) {
        Self::logger(ctx)
            .info()
            .str("subject", subject)
            .msg("subscription stopped");
    }

    /// The message router started.
    pub fn log_router_start(&self, ctx: &Context) {
        Self::logger(ctx).info().msg("router started");
    }

    /// The message router stopped.
    pub fn log_router_stop(&self, ctx: &Context) {
        Self::logger(ctx).info().msg("router stopped");
    }
}

#[cfg(not(feature = "events"))]
#[allow(clippy::unused_self)]
impl EventLogger {
    /// Create the pipeline logger.
    pub const fn new() -> Self {
        Self
    }

    /// No-op without the `events` feature.
    pub fn log_event_received(&self, _: &Context, _: &str, _: &str, _: &str) {}

    /// No-op without the `events` feature.
    pub fn log_event_processed(&self, _: &Context, _: &str, _: Duration) {}

    /// No-op without the `events` feature.
    pub fn log_event_failed(&self, _: &Context, _: &str, _: impl fmt::Display) {}

    /// No-op without the `events` feature.
    pub fn log_duplicate(&self, _: &Context, _: &str, _: &str) {}

    /// No-op without the `events` feature.
    pub fn log_dlq_entry(&self, _: &Context, _: &str, _: impl fmt::Display, _: u32) {}

    /// No-op without the `events` feature.
    pub fn log_batch_flush(&self, _: &Context, _: usize, _: Duration) {}

    /// No-op without the `events` feature.
    pub fn log_publish(&self, _: &Context, _: &str, _: &str) {}

    /// No-op without the `events` feature.
    pub fn log_subscription_start(&self, _: &Context, _: &str) {}

    /// No-op without the `events` feature.
    pub fn log_subscription_stop(&self, _: &Context, _: &str) {}

    /// No-op without the `events` feature.
    pub fn log_router_start(&self, _: &Context) {}

    /// No-op without the `events` feature.
    pub fn log_router_stop(&self, _: &Context) {}
}

#[cfg(all(test, feature = "events"))]
mod tests {
    use super::*;
    use crate::infrastructure::logging::logger::Logger;
    use crate::infrastructure::logging::writer::SharedBuffer;
    use serde_json::Value;

    fn capture() -> (SharedBuffer, Context) {
        let buf = SharedBuffer::new();
        let ctx = Context::background()
            .with_logger(Logger::new(buf.clone()))
            .with_correlation_id("corr-42");
        (buf, ctx)
    }

    fn records(buf: &SharedBuffer) -> Vec<Value> {
        buf.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_lifecycle_messages() {
        let (buf, ctx) = capture();
        let events = EventLogger::new();

        events.log_event_received(&ctx, "evt-1", "plex", "movie");
        events.log_event_processed(&ctx, "evt-1", Duration::from_millis(15));
        events.log_event_failed(&ctx, "evt-2", "constraint violation");

        let records = records(&buf);
        assert_eq!(records[0]["message"], "event received");
        assert_eq!(records[0]["component"], COMPONENT);
        assert_eq!(records[0]["correlation_id"], "corr-42");
        assert_eq!(records[0]["media_type"], "movie");
        assert_eq!(records[1]["message"], "event processed");
        assert_eq!(records[1]["duration_ms"], 15.0);
        assert_eq!(records[2]["level"], "error");
        assert_eq!(records[2]["error"], "constraint violation");
        assert_eq!(records[2]["message"], "event processing failed");
    }

    #[test]
    fn test_dlq_and_duplicates() {
        let (buf, ctx) = capture();
        let events = EventLogger::new();

        events.log_duplicate(&ctx, "evt-3", "same session key");
        events.log_dlq_entry(&ctx, "evt-4", "timeout", 5);

        let records = records(&buf);
        assert_eq!(records[0]["level"], "debug");
        assert_eq!(records[0]["message"], "duplicate event skipped");
        assert_eq!(records[1]["level"], "warn");
        assert_eq!(records[1]["message"], "event sent to DLQ");
        assert_eq!(records[1]["retry_count"], 5);
    }

    #[test]
    fn test_batch_publish_and_lifecycle() {
        let (buf, ctx) = capture();
        let events = EventLogger::new();

        events.log_batch_flush(&ctx, 250, Duration::from_millis(40));
        events.log_publish(&ctx, "playback.events", "evt-5");
        events.log_subscription_start(&ctx, "playback.events");
        events.log_subscription_stop(&ctx, "playback.events");
        events.log_router_start(&ctx);
        events.log_router_stop(&ctx);

        let messages: Vec<String> = records(&buf)
            .iter()
            .map(|r| r["message"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "batch flush completed",
                "event published",
                "subscription started",
                "subscription stopped",
                "router started",
                "router stopped",
            ]
        );
        assert!(buf.contents().contains("\"event_count\":250"));
    }
}
