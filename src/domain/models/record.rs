//! Record model of the generic leveled-logging interface.
//!
//! These types are what third-party code hands to a [`Handler`]: a numeric
//! level on an open scale, a message, and a list of typed attributes that may
//! nest through groups.
//!
//! [`Handler`]: crate::domain::ports::Handler

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Level on the generic interface's open integer scale.
///
/// The named levels sit four apart so that callers can define levels in
/// between (`GenericLevel(2)` is "a bit more than info").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenericLevel(pub i32);

impl GenericLevel {
    /// Debug boundary
    pub const DEBUG: Self = Self(-4);
    /// Info boundary
    pub const INFO: Self = Self(0);
    /// Warn boundary
    pub const WARN: Self = Self(4);
    /// Error boundary
    pub const ERROR: Self = Self(8);
}

impl Default for GenericLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for GenericLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = if self.0 < Self::INFO.0 {
            ("DEBUG", Self::DEBUG.0)
        } else if self.0 < Self::WARN.0 {
            ("INFO", Self::INFO.0)
        } else if self.0 < Self::ERROR.0 {
            ("WARN", Self::WARN.0)
        } else {
            ("ERROR", Self::ERROR.0)
        };
        match self.0 - base {
            0 => f.write_str(name),
            offset => write!(f, "{name}{offset:+}"),
        }
    }
}

/// Typed value of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// UTF-8 string
    String(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Elapsed time
    Duration(Duration),
    /// Point in time
    Time(DateTime<Utc>),
    /// Arbitrary structured value
    Any(serde_json::Value),
    /// Nested attributes sharing the enclosing key as a prefix
    Group(Vec<Attr>),
}

/// A key/value pair attached to a record or a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Field key, before group prefixing
    pub key: String,
    /// Field value
    pub value: AttrValue,
}

impl Attr {
    /// Build an attribute from a key and an already typed value.
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// String attribute.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AttrValue::String(value.into()))
    }

    /// Signed integer attribute.
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, AttrValue::Int(value))
    }

    /// Unsigned integer attribute.
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, AttrValue::Uint(value))
    }

    /// Float attribute.
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AttrValue::Float(value))
    }

    /// Boolean attribute.
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AttrValue::Bool(value))
    }

    /// Duration attribute.
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, AttrValue::Duration(value))
    }

    /// Timestamp attribute.
    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, AttrValue::Time(value))
    }

    /// Attribute holding any serializable value. Values that fail to
    /// serialize are recorded as their serializer error string.
    pub fn any<T: Serialize>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| serde_json::Value::String(format!("!ERROR: {e}")));
        Self::new(key, AttrValue::Any(value))
    }

    /// Group attribute; its children are emitted as `key.child`.
    pub fn group(key: impl Into<String>, attrs: Vec<Self>) -> Self {
        Self::new(key, AttrValue::Group(attrs))
    }
}

/// One log call on the generic interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// When the call was made
    pub time: DateTime<Utc>,
    /// Level on the generic scale
    pub level: GenericLevel,
    /// Human-readable message
    pub message: String,
    /// Attributes in call order
    pub attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current time and no attributes.
    pub fn new(level: GenericLevel, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    /// Append attributes to the record.
    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_level_display() {
        assert_eq!(GenericLevel::INFO.to_string(), "INFO");
        assert_eq!(GenericLevel::ERROR.to_string(), "ERROR");
        assert_eq!(GenericLevel(2).to_string(), "INFO+2");
        assert_eq!(GenericLevel(-8).to_string(), "DEBUG-4");
    }

    #[test]
    fn test_record_with_attrs() {
        let record = Record::new(GenericLevel::WARN, "disk almost full")
            .with_attrs([Attr::uint("free_mb", 12), Attr::string("mount", "/data")]);

        assert_eq!(record.attrs.len(), 2);
        assert_eq!(record.attrs[0].key, "free_mb");
        assert_eq!(record.attrs[1].value, AttrValue::String("/data".to_string()));
    }

    #[test]
    fn test_any_attr_serializes_value() {
        let attr = Attr::any("data", &std::collections::BTreeMap::from([("a", 1)]));
        assert_eq!(attr.value, AttrValue::Any(serde_json::json!({"a": 1})));
    }
}
