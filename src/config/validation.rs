use crate::config::types::{Config, CrawlerConfig, OutputConfig, MAX_DOWNLOAD_INTERVAL};
use crate::ConfigError;
use std::time::Duration;

/// Upper bound on the worker pool size
const MAX_WORKERS: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.requests_per_second.is_finite() || config.requests_per_second <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "requests_per_second must be a positive number, got {}",
            config.requests_per_second
        )));
    }

    match Duration::try_from_secs_f64(1.0 / config.requests_per_second) {
        Ok(interval) if interval <= MAX_DOWNLOAD_INTERVAL => {}
        _ => {
            return Err(ConfigError::Validation(format!(
                "requests_per_second must allow at least one download every {} seconds, got {}",
                MAX_DOWNLOAD_INTERVAL.as_secs(),
                config.requests_per_second
            )));
        }
    }

    if config.max_open_handles < 1 {
        return Err(ConfigError::Validation(
            "max_open_handles must be >= 1".to_string(),
        ));
    }

    if config.max_filename_length < 1 {
        return Err(ConfigError::Validation(
            "max_filename_length must be >= 1".to_string(),
        ));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.database_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "database_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
