use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Batch concurrency is at least 1 and default quality is within 0.0–1.0
/// - Remote URL is http(s), timeout is positive, and at least one format is routed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Batch validation
    if config.batch.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "batch.concurrency must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.batch.default_quality) {
        return Err(ConfigError::ValidationError(format!(
            "batch.default_quality must be between 0 and 1, got {}",
            config.batch.default_quality
        )));
    }

    // Remote validation
    if let Some(remote) = &config.remote {
        if !(remote.url.starts_with("http://") || remote.url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "remote.url must start with http:// or https://, got {:?}",
                remote.url
            )));
        }
        if remote.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "remote.timeout_secs cannot be 0".to_string(),
            ));
        }
        if remote.formats.formats().next().is_none() {
            return Err(ConfigError::ValidationError(
                "remote.formats cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RemoteConfig, ServerConfig};
    use crate::format::RemoteCapabilities;
    use crate::processor::BatchConfig;

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            remote: Some(RemoteConfig::default()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_batch() {
        let config = Config {
            batch: BatchConfig::default().with_concurrency(0),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            batch: BatchConfig::default().with_default_quality(1.5),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_remote() {
        let bad_url = Config {
            remote: Some(RemoteConfig {
                url: "ftp://converter".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_config(&bad_url).is_err());

        let no_formats = Config {
            remote: Some(RemoteConfig {
                formats: RemoteCapabilities::none(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate_config(&no_formats).unwrap_err();
        assert!(err.to_string().contains("remote.formats"));
    }
}
