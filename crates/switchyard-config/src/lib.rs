//! Shared configuration for Switchyard processes.
//!
//! Both sides of a Switchyard channel install the same telemetry stack, so the
//! log filter and log format live here rather than in the protocol crate.
//! Values come from serde (for embedding in a host application's own
//! configuration) or from `SWITCHYARD_*` environment variables.

mod defaults;
mod logging;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::defaults::{
    DEFAULT_LOG_FILTER, LOG_FILTER_ENV, LOG_FORMAT_ENV, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use self::logging::{LogFormat, LogFormatParseError};

/// Logging configuration shared by clients and servers.
///
/// # Example
///
/// ```
/// use switchyard_config::{Config, LogFormat};
///
/// let config: Config = serde_json::from_str(r#"{"log_format":"compact"}"#)
///     .expect("valid config");
/// assert_eq!(config.log_filter(), "info");
/// assert_eq!(config.log_format(), LogFormat::Compact);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing-subscriber` filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log lines.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogFormat`] when `SWITCHYARD_LOG_FORMAT`
    /// names an unknown format.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogFormat`] when the format variable
    /// names an unknown format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(filter) = non_blank(lookup(LOG_FILTER_ENV)) {
            config.log_filter = filter;
        }
        if let Some(format) = non_blank(lookup(LOG_FORMAT_ENV)) {
            config.log_format =
                LogFormat::from_str(&format).map_err(|source| ConfigError::InvalidLogFormat {
                    value: format.clone(),
                    source,
                })?;
        }
        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Errors raised while assembling a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The log format variable held an unrecognised value.
    #[error("invalid log format '{value}': {source}")]
    InvalidLogFormat {
        /// Raw value that failed to parse.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: LogFormatParseError,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn empty_lookup_keeps_defaults() {
        let config = Config::from_lookup(|_| None).expect("config");
        assert_eq!(config, Config::default());
    }

    #[rstest]
    #[case::filter_only(&[(LOG_FILTER_ENV, "switchyard=debug")], "switchyard=debug", LogFormat::Json)]
    #[case::format_only(&[(LOG_FORMAT_ENV, "COMPACT")], "info", LogFormat::Compact)]
    #[case::blank_values(&[(LOG_FILTER_ENV, "  "), (LOG_FORMAT_ENV, "")], "info", LogFormat::Json)]
    fn lookup_overrides_defaults(
        #[case] pairs: &[(&str, &str)],
        #[case] filter: &str,
        #[case] format: LogFormat,
    ) {
        let config = Config::from_lookup(lookup_from(pairs)).expect("config");
        assert_eq!(config.log_filter(), filter);
        assert_eq!(config.log_format(), format);
    }

    #[test]
    fn lookup_rejects_unknown_format() {
        let error = Config::from_lookup(lookup_from(&[(LOG_FORMAT_ENV, "yaml")]))
            .expect_err("unknown format should fail");
        assert!(matches!(error, ConfigError::InvalidLogFormat { .. }));
        assert!(error.to_string().contains("yaml"));
    }

    #[test]
    fn deserialises_with_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialise");
        assert_eq!(config, Config::default());
    }
}
