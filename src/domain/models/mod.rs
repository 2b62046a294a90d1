//! Domain models: levels, generic-interface records and security events

pub mod level;
pub mod record;
pub mod security_event;

pub use level::{Level, LogFormat, ParseFormatError, ParseLevelError};
pub use record::{Attr, AttrValue, GenericLevel, Record};
pub use security_event::SecurityEvent;
