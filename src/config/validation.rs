use crate::config::types::{Config, CrawlConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl target and depth
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::MissingHost);
    }

    validate_host(&config.host)?;

    // an empty subdomain falls back to "www"
    if !config.subdomain.is_empty() {
        validate_labels("subdomain", &config.subdomain)?;
    }

    if !config.path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "path must start with '/', got '{}'",
            config.path
        )));
    }

    if config.recursion_limit == 0 {
        return Err(ConfigError::Validation(
            "recursion_limit must be positive, or negative for unbounded".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target host (e.g., "example.com", not just "example")
fn validate_host(host: &str) -> Result<(), ConfigError> {
    validate_labels("host", host)?;

    if !host.contains('.') {
        return Err(ConfigError::Validation(format!(
            "host '{}' must contain at least one dot (e.g., 'example.com')",
            host
        )));
    }

    Ok(())
}

/// Validates a dot-separated list of host labels
fn validate_labels(field: &str, value: &str) -> Result<(), ConfigError> {
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "{} '{}' contains invalid characters",
            field, value
        )));
    }

    if value.starts_with('.')
        || value.ends_with('.')
        || value.starts_with('-')
        || value.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "{} '{}' cannot start or end with '.' or '-'",
            field, value
        )));
    }

    if value.contains("..") {
        return Err(ConfigError::Validation(format!(
            "{} '{}' cannot contain consecutive dots",
            field, value
        )));
    }

    Ok(())
}
