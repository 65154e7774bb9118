//! On-demand detail shapes: scoring plays, line scores, leaders and team
//! rosters

use serde::{Deserialize, Serialize};

use super::game::GameStatus;
use super::scoreboard::TeamRef;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoringPlaysResponse {
    #[serde(rename = "scoringPlays", default)]
    pub scoring_plays: Vec<RawScoringPlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawScoringPlay {
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub period: Option<PeriodRef>,
    #[serde(default)]
    pub clock: Option<ClockRef>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "awayScore", default)]
    pub away_score: Option<u16>,
    #[serde(rename = "homeScore", default)]
    pub home_score: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PeriodRef {
    #[serde(default)]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClockRef {
    #[serde(rename = "displayValue", default)]
    pub display_value: Option<String>,
}

/// A scoring play ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPlay {
    pub team_id: Option<String>,
    pub team_abbreviation: Option<String>,
    pub period: Option<u32>,
    pub clock: String,
    pub text: String,
    pub away_score: Option<u16>,
    pub home_score: Option<u16>,
}

/// Points per period for one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScoreRow {
    pub team: String,
    pub periods: Vec<u16>,
    pub total: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    pub away: LineScoreRow,
    pub home: LineScoreRow,
}

impl LineScore {
    /// Periods played by the longer row, overtime included
    pub fn period_count(&self) -> usize {
        self.away.periods.len().max(self.home.periods.len())
    }
}

/// Top performer of one stat category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLeader {
    /// Category label such as `Passing Leader`
    pub category: String,
    pub athlete: String,
    pub team_id: Option<String>,
    pub stat_line: String,
}

/// Everything shown when a single game is expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetail {
    pub game_id: String,
    /// Status the odds decision was made with; `None` when the game was on
    /// neither today's scoreboard nor the season's events
    pub status: Option<GameStatus>,
    pub odds: Option<String>,
    pub scoring_plays: Vec<ScoringPlay>,
    pub line_score: Option<LineScore>,
    pub leaders: Vec<GameLeader>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterResponse {
    #[serde(default)]
    pub athletes: Vec<RosterAthlete>,
}

/// Either an athlete or a position group holding athletes in `items`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterAthlete {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub jersey: Option<String>,
    #[serde(default)]
    pub position: Option<serde_json::Value>,
    #[serde(default)]
    pub items: Vec<RosterAthlete>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub position: Option<String>,
    pub jersey: Option<String>,
}
