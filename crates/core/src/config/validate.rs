use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Tracker URL is present and every timeout is non-zero
/// - Resolver thresholds are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    let tracker = &config.tracker;
    if tracker.base_url.trim().is_empty() {
        return Err(invalid("tracker.base_url cannot be empty"));
    }
    if tracker.search_timeout_secs == 0 || tracker.download_timeout_secs == 0 {
        return Err(invalid("tracker timeouts must be greater than 0"));
    }
    if config.metadata.timeout_secs == 0 {
        return Err(invalid("metadata.timeout_secs must be greater than 0"));
    }

    let resolver = &config.resolver;
    if resolver.short_title_words == 0 {
        return Err(invalid("resolver.short_title_words must be greater than 0"));
    }
    if resolver.min_candidates == 0 {
        return Err(invalid("resolver.min_candidates must be greater than 0"));
    }
    if resolver.max_candidates < resolver.min_candidates {
        return Err(invalid(
            "resolver.max_candidates cannot be lower than resolver.min_candidates",
        ));
    }
    if resolver.max_concurrent_fetches == 0 {
        return Err(invalid(
            "resolver.max_concurrent_fetches must be greater than 0",
        ));
    }
    if resolver.total_timeout_secs == 0 {
        return Err(invalid("resolver.total_timeout_secs must be greater than 0"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
