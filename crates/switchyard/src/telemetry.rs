//! Structured telemetry initialisation for processes hosting a channel.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use switchyard_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Later calls return a fresh [`TelemetryHandle`] without touching the
/// global state, so both the client and server halves of an application may
/// call this during start-up.
///
/// # Examples
///
/// ```rust
/// use switchyard::telemetry;
/// use switchyard_config::Config;
///
/// # fn main() -> Result<(), switchyard::telemetry::TelemetryError> {
/// let config = Config::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop(first);
/// drop(second);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter expression does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber is
/// already installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Parses the configured filter expression.
fn filter_for(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

/// Builds the stderr subscriber for the configured format without
/// installing it.
fn build_subscriber(config: &Config) -> Result<BoxedSubscriber, TelemetryError> {
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter_for(config)?)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: BoxedSubscriber = match config.log_format() {
        LogFormat::Json => Box::new(base.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(base.compact().finish()),
    };
    Ok(subscriber)
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    tracing::subscriber::set_global_default(build_subscriber(config)?)
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("info")]
    #[case("switchyard::dispatch=debug,warn")]
    fn accepts_filter_expressions(#[case] expression: &str) {
        let config = Config {
            log_filter: expression.to_owned(),
            ..Config::default()
        };
        assert!(filter_for(&config).is_ok());
    }

    #[test]
    fn rejects_malformed_filters() {
        let config = Config {
            log_filter: "switchyard=loud".to_owned(),
            ..Config::default()
        };
        let error = filter_for(&config).expect_err("malformed filter");
        assert!(matches!(error, TelemetryError::Filter(_)));
        assert!(error.to_string().starts_with("invalid log filter"));
    }

    #[rstest]
    #[case(LogFormat::Json)]
    #[case(LogFormat::Compact)]
    fn builds_a_subscriber_for_each_format(#[case] log_format: LogFormat) {
        let config = Config {
            log_format,
            ..Config::default()
        };
        let subscriber = build_subscriber(&config).expect("subscriber");
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "switchyard::server", channel = "shop", "handler registered");
        });
    }

    #[test]
    fn malformed_filters_stop_the_build() {
        let config = Config {
            log_filter: "switchyard=loud".to_owned(),
            ..Config::default()
        };
        assert!(matches!(
            build_subscriber(&config),
            Err(TelemetryError::Filter(_))
        ));
    }

    #[rstest]
    #[case(LogFormat::Json)]
    #[case(LogFormat::Compact)]
    fn initialisation_is_idempotent(#[case] log_format: LogFormat) {
        let config = Config {
            log_format,
            ..Config::default()
        };
        initialise(&config).expect("first initialisation");
        initialise(&config).expect("repeat initialisation");
    }
}
