use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Builds the filter used when `RUST_LOG` is absent: the configured level plus request spans
/// from `tower_http` when the service runs at debug verbosity.
pub fn configured_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directives = if config.log_level.eq_ignore_ascii_case("debug")
        || config.log_level.eq_ignore_ascii_case("trace")
    {
        format!("{},tower_http=debug", config.log_level)
    } else {
        config.log_level.clone()
    };

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(config)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_targets)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
            include_targets: false,
        }
    }

    #[test]
    fn configured_filter_accepts_plain_levels() {
        let filter = configured_filter(&telemetry("info")).expect("info is a valid filter");
        assert!(!filter.to_string().contains("tower_http"));
    }

    #[test]
    fn configured_filter_adds_request_spans_at_debug() {
        let filter = configured_filter(&telemetry("debug")).expect("debug is a valid filter");
        assert!(filter.to_string().contains("tower_http=debug"));
    }

    #[test]
    fn configured_filter_rejects_garbage() {
        let err = configured_filter(&telemetry("property_mortgage=loud")).expect_err("invalid");
        assert!(matches!(err, TelemetryError::EnvFilter { .. }));
        assert!(err.to_string().contains("property_mortgage=loud"));
    }
}
