use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    #[error("Game not found: game_id={game_id}")]
    ApiGameNotFound { game_id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("Persistence error: {message} (path: {path})")]
    Persistence { message: String, path: String },
}

/// Coarse classification of an upstream failure.
///
/// Callers in the polling path only care which of these four buckets a failure
/// falls into; the detailed variants of [`AppError`] are kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Timeout, DNS failure, refused connection.
    Transport,
    /// Non-2xx status other than 404.
    Http(u16),
    /// Body was empty, not JSON, or missing an expected field.
    Decode,
    /// The requested entity does not exist upstream.
    NotFound,
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a persistence error for a file-backed store
    pub fn persistence_error(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a game not found error
    pub fn api_game_not_found(game_id: impl Into<String>) -> Self {
        Self::ApiGameNotFound {
            game_id: game_id.into(),
        }
    }

    /// Maps the error onto the transport / http / decode / not-found taxonomy.
    /// Returns `None` for errors that did not come from an upstream call.
    pub fn fetch_kind(&self) -> Option<FetchErrorKind> {
        match self {
            AppError::NetworkTimeout { .. } | AppError::NetworkConnection { .. } => {
                Some(FetchErrorKind::Transport)
            }
            AppError::ApiFetch(e) => Some(match e.status() {
                Some(status) => FetchErrorKind::Http(status.as_u16()),
                None if e.is_decode() || e.is_body() => FetchErrorKind::Decode,
                None => FetchErrorKind::Transport,
            }),
            AppError::ApiServerError { status, .. }
            | AppError::ApiClientError { status, .. }
            | AppError::ApiServiceUnavailable { status, .. } => {
                Some(FetchErrorKind::Http(*status))
            }
            AppError::ApiRateLimit { .. } => Some(FetchErrorKind::Http(429)),
            AppError::ApiParse(_)
            | AppError::ApiMalformedJson { .. }
            | AppError::ApiUnexpectedStructure { .. }
            | AppError::ApiNoData { .. } => Some(FetchErrorKind::Decode),
            AppError::ApiNotFound { .. } | AppError::ApiGameNotFound { .. } => {
                Some(FetchErrorKind::NotFound)
            }
            _ => None,
        }
    }

    /// Check if error is retryable (network issues, server errors, rate limits).
    /// The poller never retries inside a tick; this only decides log severity.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::ApiRateLimit { .. }
        )
    }

    /// Check if error indicates data not found (business logic, not technical error)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApiNotFound { .. } | AppError::ApiGameNotFound { .. } | AppError::ApiNoData { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_persistence_error_helper() {
        let error = AppError::persistence_error("rename failed", "/tmp/odds.json");
        assert!(matches!(error, AppError::Persistence { .. }));
        assert_eq!(
            error.to_string(),
            "Persistence error: rename failed (path: /tmp/odds.json)"
        );
    }

    #[test]
    fn test_api_not_found_helper() {
        let error = AppError::api_not_found("https://api.example.com/nfl-eventodds?id=1");
        assert!(matches!(error, AppError::ApiNotFound { .. }));
        assert_eq!(
            error.to_string(),
            "API request not found (404): https://api.example.com/nfl-eventodds?id=1"
        );
    }

    #[test]
    fn test_api_server_error_helper() {
        let error =
            AppError::api_server_error(500, "Internal server error", "https://api.example.com");
        assert_eq!(
            error.to_string(),
            "API server error (500): Internal server error (URL: https://api.example.com)"
        );
    }

    #[test]
    fn test_api_game_not_found_helper() {
        let error = AppError::api_game_not_found("401547353");
        assert_eq!(error.to_string(), "Game not found: game_id=401547353");
    }

    #[test]
    fn test_fetch_kind_transport() {
        assert_eq!(
            AppError::network_timeout("url").fetch_kind(),
            Some(FetchErrorKind::Transport)
        );
        assert_eq!(
            AppError::network_connection("url", "refused").fetch_kind(),
            Some(FetchErrorKind::Transport)
        );
    }

    #[test]
    fn test_fetch_kind_http() {
        assert_eq!(
            AppError::api_server_error(500, "boom", "url").fetch_kind(),
            Some(FetchErrorKind::Http(500))
        );
        assert_eq!(
            AppError::api_client_error(403, "forbidden", "url").fetch_kind(),
            Some(FetchErrorKind::Http(403))
        );
        assert_eq!(
            AppError::api_rate_limit("slow down", "url").fetch_kind(),
            Some(FetchErrorKind::Http(429))
        );
        assert_eq!(
            AppError::api_service_unavailable(503, "down", "url").fetch_kind(),
            Some(FetchErrorKind::Http(503))
        );
    }

    #[test]
    fn test_fetch_kind_decode_and_not_found() {
        assert_eq!(
            AppError::api_malformed_json("not json", "url").fetch_kind(),
            Some(FetchErrorKind::Decode)
        );
        assert_eq!(
            AppError::api_no_data("empty", "url").fetch_kind(),
            Some(FetchErrorKind::Decode)
        );
        assert_eq!(
            AppError::api_not_found("url").fetch_kind(),
            Some(FetchErrorKind::NotFound)
        );
        assert_eq!(
            AppError::api_game_not_found("1").fetch_kind(),
            Some(FetchErrorKind::NotFound)
        );
    }

    #[test]
    fn test_fetch_kind_none_for_local_errors() {
        assert_eq!(AppError::config_error("bad").fetch_kind(), None);
        assert_eq!(AppError::persistence_error("bad", "p").fetch_kind(), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::api_server_error(500, "message", "url").is_retryable());
        assert!(AppError::api_rate_limit("message", "url").is_retryable());

        assert!(!AppError::api_not_found("url").is_retryable());
        assert!(!AppError::api_client_error(400, "message", "url").is_retryable());
        assert!(!AppError::api_malformed_json("message", "url").is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::api_not_found("url").is_not_found());
        assert!(AppError::api_game_not_found("1").is_not_found());
        assert!(!AppError::api_server_error(500, "message", "url").is_not_found());
        assert!(!AppError::network_timeout("url").is_not_found());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
        assert_eq!(app_error.fetch_kind(), Some(FetchErrorKind::Decode));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }
}
