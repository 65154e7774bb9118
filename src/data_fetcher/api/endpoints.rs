//! Upstream endpoint identities and URL building
//!
//! An [`EndpointRequest`] names one upstream operation together with its typed
//! parameters. It doubles as the result cache key, so two call sites asking for
//! the same thing share one entry.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointRequest {
    EventsByYear { year: i32 },
    ScoreboardByDay { day: NaiveDate },
    ScoreboardByWeek {
        year: i32,
        season_type: u32,
        week: u32,
    },
    Odds { game_id: String },
    ScoringPlays { game_id: String },
    Teams,
    TeamRecord { team_id: String, year: i32 },
    TeamDivision { team_id: String, year: i32 },
    TeamRoster { team_id: String },
}

impl EndpointRequest {
    /// Path of the endpoint relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            EndpointRequest::EventsByYear { .. } => "/nfl-events",
            EndpointRequest::ScoreboardByDay { .. } => "/nfl-scoreboard-day",
            EndpointRequest::ScoreboardByWeek { .. } => "/nfl-scoreboard-week",
            EndpointRequest::Odds { .. } => "/nfl-eventodds",
            EndpointRequest::ScoringPlays { .. } => "/nfl-scoringplays",
            EndpointRequest::Teams => "/nfl-team-list",
            EndpointRequest::TeamRecord { .. } => "/nfl-team-record",
            EndpointRequest::TeamDivision { .. } => "/nfl-team-groups",
            EndpointRequest::TeamRoster { .. } => "/nfl-team-roster",
        }
    }

    /// Query parameters in the order the upstream documents them.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            EndpointRequest::EventsByYear { year } => vec![("year", year.to_string())],
            EndpointRequest::ScoreboardByDay { day } => {
                vec![("day", day.format("%Y%m%d").to_string())]
            }
            EndpointRequest::ScoreboardByWeek {
                year,
                season_type,
                week,
            } => vec![
                ("year", year.to_string()),
                ("seasontype", season_type.to_string()),
                ("week", week.to_string()),
            ],
            EndpointRequest::Odds { game_id } | EndpointRequest::ScoringPlays { game_id } => {
                vec![("id", game_id.clone())]
            }
            EndpointRequest::Teams => Vec::new(),
            EndpointRequest::TeamRecord { team_id, year }
            | EndpointRequest::TeamDivision { team_id, year } => {
                vec![("id", team_id.clone()), ("year", year.to_string())]
            }
            EndpointRequest::TeamRoster { team_id } => vec![("id", team_id.clone())],
        }
    }

    /// Builds the full URL for logging and error messages.
    ///
    /// # Example
    /// ```
    /// use nfl_scoreboard::data_fetcher::api::EndpointRequest;
    ///
    /// let request = EndpointRequest::Odds { game_id: "401671789".to_string() };
    /// assert_eq!(
    ///     request.url("https://api.example.com"),
    ///     "https://api.example.com/nfl-eventodds?id=401671789"
    /// );
    /// ```
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let query = self
            .query()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        if query.is_empty() {
            format!("{base}{}", self.path())
        } else {
            format!("{base}{}?{query}", self.path())
        }
    }

    /// Game id carried by per-game requests.
    pub fn game_id(&self) -> Option<&str> {
        match self {
            EndpointRequest::Odds { game_id } | EndpointRequest::ScoringPlays { game_id } => {
                Some(game_id)
            }
            _ => None,
        }
    }
}

impl fmt::Display for EndpointRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().trim_start_matches('/'))?;
        for (key, value) in self.query() {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}
