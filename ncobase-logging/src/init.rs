use anyhow::Result;
use ncobase_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter from `directives`, then `RUST_LOG`, then plain `info`
pub fn build_env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber from configuration.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(build_env_filter(&config.filter()));

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize plain console tracing at `log_level`
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    if tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(log_level))
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncobase_config::LogLevel;

    #[test]
    fn test_repeated_init_does_not_fail() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Json,
            directives: vec!["sqlx=warn".to_string()],
        };
        assert!(init_logging_from_config(&config).is_ok());
        assert!(init_logging_from_config(&config).is_ok());
        assert!(init_simple_tracing("info").is_ok());
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        let filter = build_env_filter("not a [valid filter");
        assert!(!filter.to_string().is_empty());
    }
}
