//! Application-wide constants and configuration defaults
//!
//! This module centralizes the magic numbers of the scoreboard core so the
//! config layer, the poller and the tests agree on the same values.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Upstream host served through the RapidAPI gateway
pub const DEFAULT_API_HOST: &str = "nfl-api-data.p.rapidapi.com";

/// Base URL for all upstream endpoints
pub const DEFAULT_API_BASE_URL: &str = "https://nfl-api-data.p.rapidapi.com";

/// Sportsbook whose line is shown and remembered (ESPN BET)
pub const ODDS_PROVIDER_ID: &str = "58";

/// Name of the application directory under the platform config/data dirs
pub const APP_DIR_NAME: &str = "nfl_scoreboard";

/// Default log file name
pub const LOG_FILE_NAME: &str = "nfl_scoreboard.log";

/// Upstream request headers carrying the API credentials
pub mod headers {
    pub const API_KEY: &str = "x-rapidapi-key";
    pub const API_HOST: &str = "x-rapidapi-host";
}

/// Cache TTL (Time To Live) defaults in seconds, one per calling site
pub mod cache_ttl {
    /// Season calendar and events-by-year (30 minutes)
    pub const EVENTS_SECONDS: u64 = 1800;

    /// Day scoreboard. Kept below the live poll interval so every live tick
    /// sees a fresh payload.
    pub const SCOREBOARD_SECONDS: u64 = 10;

    /// Pregame odds lines (15 minutes)
    pub const ODDS_SECONDS: u64 = 900;

    /// Scoring plays for the on-demand detail view
    pub const SCORING_PLAYS_SECONDS: u64 = 30;

    /// Team list and rosters (24 hours)
    pub const TEAMS_SECONDS: u64 = 86400;
}

/// Poll scheduler intervals in seconds
pub mod polling {
    /// Interval while no tracked game is in progress
    pub const IDLE_SECONDS: u64 = 300;

    /// Interval while at least one tracked game is in progress
    pub const LIVE_SECONDS: u64 = 15;

    /// Interval of the weekly odds sweep
    pub const ODDS_SWEEP_SECONDS: u64 = 3600;

    /// Upper bound on concurrent team fetches during a standings refresh
    pub const STANDINGS_CONCURRENCY: usize = 4;
}

/// Upstream season type codes, sent as `seasontype` on week requests
pub mod season_type {
    pub const PRESEASON: u32 = 1;
    pub const REGULAR: u32 = 2;
    pub const POSTSEASON: u32 = 3;
}

/// File names inside the data directory
pub mod files {
    pub const ODDS_LEDGER: &str = "last_fetched_odds.json";
    pub const TEAM_RECORDS: &str = "team_records.json";
    pub const TEAM_DIVISIONS: &str = "team_divisions.json";
}

/// Environment variable names
pub mod env_vars {
    /// Override for the API key
    pub const API_KEY: &str = "NFL_API_KEY";

    /// Override for the API host header
    pub const API_HOST: &str = "NFL_API_HOST";

    /// Override for the API base URL
    pub const API_BASE_URL: &str = "NFL_API_BASE_URL";

    /// Override for the data directory holding the ledger and standings
    pub const DATA_DIR: &str = "NFL_DATA_DIR";

    /// Override for the log file path
    pub const LOG_FILE: &str = "NFL_LOG_FILE";

    /// Override for the HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "NFL_HTTP_TIMEOUT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_constants_are_reasonable() {
        let scoreboard = cache_ttl::SCOREBOARD_SECONDS;
        let odds = cache_ttl::ODDS_SECONDS;
        let events = cache_ttl::EVENTS_SECONDS;
        let teams = cache_ttl::TEAMS_SECONDS;

        // A live tick must never be served a scoreboard older than one tick
        assert!(scoreboard < polling::LIVE_SECONDS);
        assert!(odds < events);
        assert!(events < teams);
    }

    #[test]
    fn test_polling_constants_are_reasonable() {
        assert!(polling::LIVE_SECONDS < polling::IDLE_SECONDS);
        assert!(polling::IDLE_SECONDS < polling::ODDS_SWEEP_SECONDS);
        assert!(polling::STANDINGS_CONCURRENCY > 0);
    }

    #[test]
    fn test_env_var_names_are_not_empty() {
        assert!(!env_vars::API_KEY.is_empty());
        assert!(!env_vars::API_HOST.is_empty());
        assert!(!env_vars::DATA_DIR.is_empty());
        assert!(!env_vars::LOG_FILE.is_empty());
    }

    #[test]
    fn test_default_base_url_matches_host() {
        assert!(DEFAULT_API_BASE_URL.ends_with(DEFAULT_API_HOST));
    }
}
