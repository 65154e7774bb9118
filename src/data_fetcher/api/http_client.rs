//! HTTP client creation and configuration utilities

use crate::config::Config;
use crate::constants::{HTTP_POOL_MAX_IDLE_PER_HOST, headers};
use crate::error::AppError;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

/// Creates the HTTP client used for every upstream call.
///
/// # Features
/// * Fixed auth header pair installed as default headers
/// * Request timeout from the config; an expired timeout surfaces as a transport error
/// * Connection pooling with a bounded idle pool per host
pub fn create_http_client(config: &Config) -> Result<Client, AppError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        headers::API_KEY,
        HeaderValue::from_str(&config.api_key)
            .map_err(|_| AppError::config_error("API key contains invalid header characters"))?,
    );
    default_headers.insert(
        headers::API_HOST,
        HeaderValue::from_str(&config.api_host)
            .map_err(|_| AppError::config_error("API host contains invalid header characters"))?,
    );

    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
        .map_err(AppError::ApiFetch)
}
