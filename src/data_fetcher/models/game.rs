use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse game state used for polling decisions and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    pub fn is_live(self) -> bool {
        self == GameStatus::InProgress
    }

    /// Position in the presentation order: live games first, then upcoming,
    /// then finished.
    pub fn display_rank(self) -> u8 {
        match self {
            GameStatus::InProgress => 0,
            GameStatus::Scheduled => 1,
            GameStatus::Final => 2,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::InProgress => "In Progress",
            GameStatus::Final => "Final",
        };
        f.write_str(label)
    }
}

/// One side of a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamLine {
    pub team_id: String,
    pub name: String,
    pub abbreviation: Option<String>,
    pub score: Option<u16>,
    /// Overall record summary such as `10-7`
    pub record: Option<String>,
}

impl TeamLine {
    /// Abbreviation when present, otherwise the display name
    pub fn short_name(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}

/// Normalized view of one upstream event, rebuilt every poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub home: TeamLine,
    pub away: TeamLine,
    pub status: GameStatus,
    /// Upstream status text, e.g. `Halftime` or `Final/OT`
    pub status_detail: String,
    pub period: Option<u32>,
    pub clock: Option<String>,
    /// Team id of the side with the ball
    pub possession: Option<String>,
    pub down_distance: Option<String>,
    pub odds: Option<String>,
    pub kickoff: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    /// Television network
    pub broadcast: Option<String>,
    pub headline: Option<String>,
}

impl GameRecord {
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Which side has possession, if it is one of the two teams
    pub fn possession_side(&self) -> Option<&TeamLine> {
        let possession = self.possession.as_deref()?;
        if possession == self.home.team_id {
            Some(&self.home)
        } else if possession == self.away.team_id {
            Some(&self.away)
        } else {
            None
        }
    }
}
