use crate::constants::{self, cache_ttl, env_vars, polling};
use crate::error::AppError;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod user_prompts;
pub mod validation;

use paths::{get_config_path, get_default_data_dir, get_log_dir_path};
use user_prompts::prompt_for_api_key;
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// API key sent with every upstream request.
    pub api_key: String,
    /// Value of the host header expected by the API gateway.
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Base URL that endpoint paths are appended to. Should include https:// prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Season whose calendar and standings are fetched.
    #[serde(default = "default_season_year")]
    pub season_year: i32,
    /// Directory holding the odds ledger and standings files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Poll interval while no game is in progress.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Poll interval while at least one game is in progress.
    #[serde(default = "default_live_poll_interval")]
    pub live_poll_interval_seconds: u64,
    /// Interval of the weekly odds sweep.
    #[serde(default = "default_odds_sweep_interval")]
    pub odds_sweep_interval_seconds: u64,
    /// Per-endpoint cache lifetimes.
    #[serde(default)]
    pub cache_ttl: CacheTtls,
}

/// Cache lifetimes per calling site, in seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheTtls {
    #[serde(default = "default_events_ttl")]
    pub events_seconds: u64,
    #[serde(default = "default_scoreboard_ttl")]
    pub scoreboard_seconds: u64,
    #[serde(default = "default_odds_ttl")]
    pub odds_seconds: u64,
    #[serde(default = "default_scoring_plays_ttl")]
    pub scoring_plays_seconds: u64,
    #[serde(default = "default_teams_ttl")]
    pub teams_seconds: u64,
}

fn default_api_host() -> String {
    constants::DEFAULT_API_HOST.to_string()
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

/// The NFL season is named after the year it starts in; January and February
/// games still belong to the previous year's season.
fn default_season_year() -> i32 {
    let now = Utc::now();
    if now.month() < 3 {
        now.year() - 1
    } else {
        now.year()
    }
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_poll_interval() -> u64 {
    polling::IDLE_SECONDS
}

fn default_live_poll_interval() -> u64 {
    polling::LIVE_SECONDS
}

fn default_odds_sweep_interval() -> u64 {
    polling::ODDS_SWEEP_SECONDS
}

fn default_events_ttl() -> u64 {
    cache_ttl::EVENTS_SECONDS
}

fn default_scoreboard_ttl() -> u64 {
    cache_ttl::SCOREBOARD_SECONDS
}

fn default_odds_ttl() -> u64 {
    cache_ttl::ODDS_SECONDS
}

fn default_scoring_plays_ttl() -> u64 {
    cache_ttl::SCORING_PLAYS_SECONDS
}

fn default_teams_ttl() -> u64 {
    cache_ttl::TEAMS_SECONDS
}

impl Default for CacheTtls {
    fn default() -> Self {
        CacheTtls {
            events_seconds: default_events_ttl(),
            scoreboard_seconds: default_scoreboard_ttl(),
            odds_seconds: default_odds_ttl(),
            scoring_plays_seconds: default_scoring_plays_ttl(),
            teams_seconds: default_teams_ttl(),
        }
    }
}

impl CacheTtls {
    pub fn events(&self) -> Duration {
        Duration::from_secs(self.events_seconds)
    }

    pub fn scoreboard(&self) -> Duration {
        Duration::from_secs(self.scoreboard_seconds)
    }

    pub fn odds(&self) -> Duration {
        Duration::from_secs(self.odds_seconds)
    }

    pub fn scoring_plays(&self) -> Duration {
        Duration::from_secs(self.scoring_plays_seconds)
    }

    pub fn teams(&self) -> Duration {
        Duration::from_secs(self.teams_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            api_host: default_api_host(),
            api_base_url: default_api_base_url(),
            season_year: default_season_year(),
            data_dir: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            poll_interval_seconds: default_poll_interval(),
            live_poll_interval_seconds: default_live_poll_interval(),
            odds_sweep_interval_seconds: default_odds_sweep_interval(),
            cache_ttl: CacheTtls::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, prompts user for the API key and creates one.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `NFL_API_KEY` - Override API key
    /// - `NFL_API_HOST` - Override API host header
    /// - `NFL_API_BASE_URL` - Override API base URL
    /// - `NFL_DATA_DIR` - Override data directory
    /// - `NFL_LOG_FILE` - Override log file path
    /// - `NFL_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    ///
    /// # Notes
    /// - Config file is stored in platform-specific config directory
    /// - Handles first-time setup with user prompts
    /// - Environment variables take precedence over config file
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else if std::env::var(env_vars::API_KEY).is_ok() {
            // Filled in by the override pass below
            Config::default()
        } else {
            let config = Config {
                api_key: prompt_for_api_key().await?,
                ..Config::default()
            };
            config.save().await?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `NFL_*` environment variable overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = api_key;
        }

        if let Ok(api_host) = std::env::var(env_vars::API_HOST) {
            self.api_host = api_host;
        }

        if let Ok(base_url) = std::env::var(env_vars::API_BASE_URL) {
            self.api_base_url = base_url;
        }

        if let Ok(data_dir) = std::env::var(env_vars::DATA_DIR) {
            self.data_dir = Some(data_dir);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Directory for the odds ledger and standings files: the configured
    /// `data_dir`, or the platform data directory.
    pub fn data_dir_path(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(get_default_data_dir)
    }

    /// Poll interval while no game is live.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Poll interval while a game is live.
    pub fn live_poll_interval(&self) -> Duration {
        Duration::from_secs(self.live_poll_interval_seconds)
    }

    /// Interval of the weekly odds sweep.
    pub fn odds_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.odds_sweep_interval_seconds)
    }

    /// Displays current configuration settings to stdout.
    /// The API key is masked except for its last four characters.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Key:");
            println!("{}", mask_api_key(&config.api_key));
            println!("────────────────────────────────────");
            println!("API Base URL:");
            println!("{}", config.api_base_url);
            println!("────────────────────────────────────");
            println!("Season:");
            println!("{}", config.season_year);
            println!("────────────────────────────────────");
            println!("Data Directory:");
            println!("{}", config.data_dir_path().display());
            println!("────────────────────────────────────");
            println!("Poll Intervals:");
            println!(
                "{}s idle, {}s live, {}s odds sweep",
                config.poll_interval_seconds,
                config.live_poll_interval_seconds,
                config.odds_sweep_interval_seconds
            );
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/{}", constants::LOG_FILE_NAME);
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the base
    /// URL carries a scheme.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let api_base_url = if self.api_base_url.starts_with("https://")
            || self.api_base_url.starts_with("http://")
        {
            self.api_base_url.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.api_base_url.trim_end_matches('/'))
        };
        let content = toml::to_string_pretty(&Config {
            api_base_url,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_api_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{visible}")
    }
}
