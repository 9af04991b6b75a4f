use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid --log-level filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("could not install the log subscriber: {0}")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Send `tracing` output to stderr. `RUST_LOG` takes precedence over the
/// `--log-level` fallback.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(log_level).map_err(|source| TelemetryError::Filter {
            value: log_level.to_string(),
            source,
        })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_reports_value() {
        let err = EnvFilter::try_new("cuvee_core=loud")
            .map_err(|source| TelemetryError::Filter {
                value: "cuvee_core=loud".into(),
                source,
            })
            .unwrap_err();
        assert!(err.to_string().contains("cuvee_core=loud"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
