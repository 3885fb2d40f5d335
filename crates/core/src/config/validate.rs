use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Database path is not empty
/// - At least one acceptable result status is configured
/// - Worker poll interval is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Database validation
    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    if config.database.acceptable_statuses.is_empty() {
        return Err(ConfigError::ValidationError(
            "database.acceptable_statuses cannot be empty".to_string(),
        ));
    }

    // Worker validation
    if config.worker.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "worker.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_path_fails() {
        let mut config = Config::default();
        config.database.path = PathBuf::new();
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_acceptable_statuses_fails() {
        let mut config = Config::default();
        config.database.acceptable_statuses.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut config = Config::default();
        config.worker.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
