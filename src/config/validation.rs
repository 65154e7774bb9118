use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - API key cannot be empty
/// - API base URL must carry an http:// or https:// scheme
/// - Poll intervals must be non-zero, and the live interval cannot exceed the idle one
/// - HTTP timeout must be non-zero
/// - If log file path is provided, it cannot be empty and its parent must be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.api_key.trim().is_empty() {
        return Err(AppError::config_error("API key cannot be empty"));
    }

    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://")
    {
        return Err(AppError::config_error(
            "API base URL must start with http:// or https://",
        ));
    }

    if config.api_host.trim().is_empty() {
        return Err(AppError::config_error("API host cannot be empty"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("HTTP timeout must be at least 1 second"));
    }

    if config.poll_interval_seconds == 0
        || config.live_poll_interval_seconds == 0
        || config.odds_sweep_interval_seconds == 0
    {
        return Err(AppError::config_error("Poll intervals must be non-zero"));
    }

    if config.live_poll_interval_seconds > config.poll_interval_seconds {
        return Err(AppError::config_error(format!(
            "Live poll interval ({}s) cannot be longer than the idle poll interval ({}s)",
            config.live_poll_interval_seconds, config.poll_interval_seconds
        )));
    }

    // Validate log file path if provided
    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
