use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity level of a log record.
///
/// Levels are ordered from most verbose (`Trace`) to most severe (`Panic`).
/// `Disabled` sorts above every real severity so that a minimum level of
/// `Disabled` gates everything out.
///
/// # Examples
///
/// ```
/// use cartolog::Level;
///
/// assert!(Level::Error > Level::Info);
/// assert!(Level::Trace < Level::Debug);
/// assert!(Level::Panic < Level::Disabled);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Most verbose level - detailed trace information
    Trace = 0,
    /// Debug information useful during development
    Debug = 1,
    /// Informational messages about normal operations
    #[default]
    Info = 2,
    /// Potentially problematic situations
    Warn = 3,
    /// Failure conditions
    Error = 4,
    /// Emitted right before the process exits
    Fatal = 5,
    /// Emitted right before the calling thread panics
    Panic = 6,
    /// Gates out every record
    Disabled = 7,
}

/// Error returned by the strict [`Level::from_str`] parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error, fatal, panic, disabled")]
pub struct ParseLevelError(pub String);

impl Level {
    /// Every level in severity order.
    pub const ALL: [Self; 8] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Panic,
        Self::Disabled,
    ];

    /// Lowercase name, as written to the `level` field of JSON records.
    ///
    /// ```
    /// use cartolog::Level;
    ///
    /// assert_eq!(Level::Info.as_str(), "info");
    /// assert_eq!(Level::Warn.as_str(), "warn");
    /// ```
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
            Self::Disabled => "disabled",
        }
    }

    /// Three-letter tag used by the console format.
    pub const fn abbrev(&self) -> &'static str {
        match self {
            Self::Trace => "TRC",
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warn => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
            Self::Panic => "PNC",
            Self::Disabled => "---",
        }
    }

    /// Parse a level name, falling back to [`Level::Info`] for anything
    /// unrecognized. Configuration must never fail because of a typo.
    ///
    /// ```
    /// use cartolog::Level;
    ///
    /// assert_eq!(Level::parse_lossy("DEBUG"), Level::Debug);
    /// assert_eq!(Level::parse_lossy("verbose"), Level::Info);
    /// assert_eq!(Level::parse_lossy(""), Level::Info);
    /// ```
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub(crate) const fn to_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warn,
            4 => Self::Error,
            5 => Self::Fatal,
            6 => Self::Panic,
            _ => Self::Disabled,
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output encoding of the backend logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable `HH:MM:SS LVL message key=value` lines
    Console,
}

/// Error returned by the strict [`LogFormat::from_str`] parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid log format: {0}. Must be one of: json, console")]
pub struct ParseFormatError(pub String);

impl LogFormat {
    /// Lowercase name of the format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Console => "console",
        }
    }

    /// Parse a format name, falling back to [`LogFormat::Json`].
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "console" | "pretty" | "text" => Ok(Self::Console),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
