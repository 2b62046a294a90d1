use serde::{Deserialize, Serialize};

use super::writer::LogWriter;
use crate::domain::models::level::{Level, LogFormat};

/// Logging configuration
///
/// Every field may be left at its zero value: [`LoggerConfig::normalized`]
/// fills in defaults, and level/format strings are parsed lossily, so a
/// configuration can never fail to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error, fatal, panic, disabled)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (json, console)
    #[serde(default = "default_format")]
    pub format: String,

    /// Add the `file:line` of each log call
    #[serde(default)]
    pub include_caller: bool,

    /// Add a timestamp to each record
    #[serde(default = "default_true")]
    pub include_timestamp: bool,

    /// Destination stream; standard error unless set programmatically
    #[serde(skip)]
    pub output: LogWriter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            include_caller: false,
            include_timestamp: true,
            output: LogWriter::default(),
        }
    }
}

impl LoggerConfig {
    /// Configuration writing to `output` with every other field defaulted.
    pub fn with_output(output: impl Into<LogWriter>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Replace empty level/format strings with their defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.level.trim().is_empty() {
            self.level = default_log_level();
        }
        if self.format.trim().is_empty() {
            self.format = default_format();
        }
        self
    }

    /// Effective level; unknown names resolve to `info`.
    pub fn parsed_level(&self) -> Level {
        Level::parse_lossy(&self.level)
    }

    /// Effective format; unknown names resolve to `json`.
    pub fn parsed_format(&self) -> LogFormat {
        LogFormat::parse_lossy(&self.format)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

const fn default_true() -> bool {
    true
}
