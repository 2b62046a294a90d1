use anyhow::{ensure, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::models::level::{Level, LogFormat};
use crate::infrastructure::logging::config::LoggerConfig;
use crate::infrastructure::logging::logger::Logger;

/// Environment variable that switches on fuzz-testing mode.
pub const FUZZ_MODE_ENV: &str = "FUZZ_MODE";

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Level name that is not one of the known levels
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error, fatal, panic, disabled")]
    InvalidLogLevel(String),

    /// Format name that is neither json nor console
    #[error("Invalid log format: {0}. Must be one of: json, console")]
    InvalidLogFormat(String),
}

/// Configuration loader for the logging facility
///
/// Precedence (lowest to highest):
/// 1. Programmatic defaults (Serialized)
/// 2. YAML file, when loading from a file
/// 3. Environment variables (`LOG_LEVEL`, `LOG_FORMAT`, `LOG_CALLER`,
///    `LOG_TIMESTAMP`)
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read the configuration from the environment.
    ///
    /// Never fails: each field that is missing or malformed keeps its default,
    /// and malformed values are reported once on standard error.
    pub fn from_env() -> LoggerConfig {
        let figment = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(env_provider());
        let defaults = LoggerConfig::default();

        LoggerConfig {
            level: lenient(&figment, "level", defaults.level),
            format: lenient(&figment, "format", defaults.format),
            include_caller: lenient(&figment, "include_caller", defaults.include_caller),
            include_timestamp: lenient(&figment, "include_timestamp", defaults.include_timestamp),
            output: defaults.output,
        }
        .normalized()
    }

    /// Load configuration from a YAML file, with environment overrides.
    ///
    /// Unlike [`ConfigLoader::from_env`] this is strict: a missing or
    /// unparsable file is an error.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<LoggerConfig> {
        let path = path.as_ref();
        ensure!(path.is_file(), "config file not found: {}", path.display());

        let config: LoggerConfig = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(Yaml::file(path))
            .merge(env_provider())
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Ok(config.normalized())
    }

    /// Strict validation for callers that prefer rejecting bad values over
    /// silently degrading to defaults.
    pub fn validate(config: &LoggerConfig) -> Result<(), ConfigError> {
        let level = config.level.trim();
        if !level.is_empty() && level.parse::<Level>().is_err() {
            return Err(ConfigError::InvalidLogLevel(config.level.clone()));
        }

        let format = config.format.trim();
        if !format.is_empty() && format.parse::<LogFormat>().is_err() {
            return Err(ConfigError::InvalidLogFormat(config.format.clone()));
        }

        Ok(())
    }

    /// Whether fuzz-testing mode is switched on in the environment.
    pub fn fuzz_mode() -> bool {
        std::env::var(FUZZ_MODE_ENV).is_ok_and(|value| {
            matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}

/// `LOG_*` variables, with the short names mapped onto config fields.
fn env_provider() -> Env {
    Env::prefixed("LOG_")
        .only(&["level", "format", "caller", "timestamp"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "caller" => "include_caller".into(),
            "timestamp" => "include_timestamp".into(),
            other => other.to_string().into(),
        })
}

fn lenient<T: DeserializeOwned>(figment: &Figment, key: &str, default: T) -> T {
    figment.extract_inner(key).unwrap_or_else(|err| {
        Logger::default()
            .warn()
            .str("key", key)
            .err(err)
            .msg("ignoring invalid logging configuration value");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOG_VARS: [(&str, Option<&str>); 5] = [
        ("LOG_LEVEL", None),
        ("LOG_FORMAT", None),
        ("LOG_CALLER", None),
        ("LOG_TIMESTAMP", None),
        (FUZZ_MODE_ENV, None),
    ];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(LOG_VARS, || {
            let config = ConfigLoader::from_env();
            assert_eq!(config.level, "info");
            assert_eq!(config.format, "json");
            assert!(!config.include_caller);
            assert!(config.include_timestamp);
        });
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("LOG_LEVEL", Some("DEBUG")),
                ("LOG_FORMAT", Some("console")),
                ("LOG_CALLER", Some("true")),
                ("LOG_TIMESTAMP", Some("false")),
            ],
            || {
                let config = ConfigLoader::from_env();
                assert_eq!(config.parsed_level(), Level::Debug);
                assert_eq!(config.parsed_format(), LogFormat::Console);
                assert!(config.include_caller);
                assert!(!config.include_timestamp);
            },
        );
    }

    #[test]
    fn test_from_env_unknown_level_resolves_to_info() {
        temp_env::with_vars(
            [("LOG_LEVEL", Some("verbose")), ("LOG_FORMAT", None)],
            || {
                let config = ConfigLoader::from_env();
                assert_eq!(config.parsed_level(), Level::Info);
            },
        );
    }

    #[test]
    fn test_from_env_bad_bool_keeps_other_fields() {
        temp_env::with_vars(
            [("LOG_LEVEL", Some("warn")), ("LOG_CALLER", Some("sometimes"))],
            || {
                let config = ConfigLoader::from_env();
                assert_eq!(config.parsed_level(), Level::Warn);
                assert!(!config.include_caller);
            },
        );
    }

    #[test]
    fn test_fuzz_mode() {
        temp_env::with_var(FUZZ_MODE_ENV, Some("1"), || {
            assert!(ConfigLoader::fuzz_mode());
        });
        temp_env::with_var(FUZZ_MODE_ENV, Some("false"), || {
            assert!(!ConfigLoader::fuzz_mode());
        });
        temp_env::with_var(FUZZ_MODE_ENV, None::<&str>, || {
            assert!(!ConfigLoader::fuzz_mode());
        });
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "level: error\nformat: console\ninclude_caller: true").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(LOG_VARS, || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.parsed_level(), Level::Error);
            assert_eq!(config.parsed_format(), LogFormat::Console);
            assert!(config.include_caller);
            assert!(config.include_timestamp);
        });
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "level: error").unwrap();
        file.flush().unwrap();

        temp_env::with_var("LOG_LEVEL", Some("trace"), || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.parsed_level(), Level::Trace, "env should win");
        });
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ConfigLoader::load_from_file("/definitely/not/here.yaml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_validate() {
        assert!(ConfigLoader::validate(&LoggerConfig::default()).is_ok());

        let config = LoggerConfig {
            level: "loud".to_string(),
            ..LoggerConfig::default()
        };
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );

        let config = LoggerConfig {
            format: "xml".to_string(),
            ..LoggerConfig::default()
        };
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat("xml".to_string()))
        );

        let config = LoggerConfig {
            level: String::new(),
            ..LoggerConfig::default()
        };
        assert!(ConfigLoader::validate(&config).is_ok(), "empty means default");
    }
}
