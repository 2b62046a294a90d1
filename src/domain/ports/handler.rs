use crate::domain::models::record::{Attr, GenericLevel, Record};

/// Port trait for the generic leveled-logging interface
///
/// This trait defines the minimal contract that third-party components use to
/// log without knowing anything about the backend: an enabled check, a
/// record sink, and two derivation operations that pre-bind attributes or
/// open a nesting group.
///
/// # Hexagonal Architecture
///
/// - This trait is a **port** defined in the domain layer
/// - [`LogHandler`](crate::LogHandler) is the **adapter** that drives the
///   backend logger; [`TracingBridge`](crate::TracingBridge) feeds `tracing`
///   events through any implementation
/// - Consumers depend on this trait only, so every component converges on the
///   same sink whatever interface it was written against
///
/// # Value Semantics
///
/// Handlers are immutable values. `with_attrs` and `with_group` return a new
/// handler and leave the receiver untouched, so a common ancestor can be
/// shared by many threads while each derives its own children.
///
/// # Examples
///
/// ```
/// use cartolog::{Attr, GenericLevel, Handler, LogHandler, Logger, Record, SharedBuffer};
///
/// let buf = SharedBuffer::new();
/// let handler = LogHandler::with_logger(Logger::new(buf.clone()))
///     .with_group("request")
///     .with_attrs(vec![Attr::string("method", "GET")]);
///
/// if handler.enabled(GenericLevel::INFO) {
///     handler.handle(&Record::new(GenericLevel::INFO, "served").with_attrs([Attr::int("status", 200)]));
/// }
///
/// assert!(buf.contents().contains("\"request.status\":200"));
/// ```
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be emitted
    ///
    /// Callers use this to skip building expensive attributes.
    fn enabled(&self, level: GenericLevel) -> bool;

    /// Emit one record
    ///
    /// Pre-bound attributes come first, then the record's own attributes.
    /// Handling never fails: unknown levels and values degrade to defaults.
    fn handle(&self, record: &Record);

    /// Derive a handler that adds `attrs` to every record
    #[must_use]
    fn with_attrs(&self, attrs: Vec<Attr>) -> Self
    where
        Self: Sized;

    /// Derive a handler that nests every subsequent key under `name`
    ///
    /// An empty name is a no-op and returns an equivalent handler.
    #[must_use]
    fn with_group(&self, name: &str) -> Self
    where
        Self: Sized;
}
