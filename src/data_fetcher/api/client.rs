//! Upstream client: one GET per call, uniform error mapping, no retries

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use super::endpoints::EndpointRequest;
use super::http_client::create_http_client;
use crate::config::Config;
use crate::error::AppError;

/// Thin wrapper around the HTTP client that knows the API base URL.
///
/// A failed call is never retried here. The poller simply tries again on its
/// next tick, and on-demand callers decide for themselves.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Builds a client with the auth headers and timeout from `config`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self::with_client(
            create_http_client(config)?,
            config.api_base_url.clone(),
        ))
    }

    /// Wraps an existing HTTP client.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues the request and parses the body as a JSON tree.
    ///
    /// # Errors
    /// * timeout / connection failure → `NetworkTimeout` / `NetworkConnection`
    /// * non-2xx status → `ApiNotFound`, `ApiRateLimit`, `ApiClientError`,
    ///   `ApiServiceUnavailable` or `ApiServerError`
    /// * empty body → `ApiNoData`, non-JSON body → `ApiMalformedJson`
    #[instrument(skip(self), fields(request = %request))]
    pub async fn call(&self, request: &EndpointRequest) -> Result<Value, AppError> {
        let url = request.url(&self.base_url);
        info!("Fetching data from URL: {url}");

        let response = self
            .http
            .get(format!("{}{}", self.base_url, request.path()))
            .query(&request.query())
            .send()
            .await
            .map_err(|e| {
                error!("Request failed for URL {}: {}", url, e);
                map_transport_error(e, &url)
            })?;

        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            let status_code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("Unknown error");

            error!("HTTP {} - {} (URL: {})", status_code, reason, url);

            return Err(match status_code {
                404 => AppError::api_not_found(&url),
                429 => AppError::api_rate_limit(reason, &url),
                400..=499 => AppError::api_client_error(status_code, reason, &url),
                502 | 503 => AppError::api_service_unavailable(status_code, reason, &url),
                _ => AppError::api_server_error(status_code, reason, &url),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            error!("Failed to read response text from URL {}: {}", url, e);
            map_transport_error(e, &url)
        })?;

        debug!("Response length: {} bytes", response_text.len());

        if response_text.trim().is_empty() {
            return Err(AppError::api_no_data("Response body is empty", &url));
        }

        serde_json::from_str::<Value>(&response_text).map_err(|e| {
            error!(
                "Failed to parse API response: {} (URL: {}), first 200 chars: {}",
                e,
                url,
                response_text.chars().take(200).collect::<String>()
            );
            AppError::api_malformed_json(e.to_string(), &url)
        })
    }
}

fn map_transport_error(e: reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}
