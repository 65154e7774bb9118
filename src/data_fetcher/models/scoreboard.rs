//! Wire shapes of the scoreboard, events and odds payloads
//!
//! Every field is optional or defaulted. The upstream leaves fields out
//! freely (no `situation` before kickoff, no `odds` after it), and a missing
//! field must only ever cost the one record that needed it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the scoreboard and events-by-year endpoints.
///
/// Events are kept as raw JSON so that one event failing to deserialize
/// does not take the rest of the payload down with it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreboardResponse {
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct League {
    #[serde(default)]
    pub calendar: Vec<CalendarGroup>,
}

/// One season part (preseason, regular season, postseason)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarGroup {
    #[serde(default)]
    pub label: Option<String>,
    /// Season type as a string: `1` preseason, `2` regular season,
    /// `3` postseason
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub entries: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub label: String,
    /// Week number within the season part, as a string
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Event {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Competition {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub situation: Option<Situation>,
    #[serde(default)]
    pub odds: Vec<OddsSummary>,
    #[serde(default)]
    pub venue: Option<Venue>,
    /// Short network name, e.g. `CBS`
    #[serde(default)]
    pub broadcast: Option<String>,
    #[serde(default)]
    pub broadcasts: Vec<Broadcast>,
    #[serde(default)]
    pub headlines: Vec<Headline>,
    #[serde(default)]
    pub leaders: Vec<LeaderCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Broadcast {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Headline {
    #[serde(rename = "shortLinkText", default)]
    pub short_link_text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Statistical leaders of one category (passing, rushing, receiving)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeaderCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub leaders: Vec<LeaderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeaderEntry {
    /// Stat line such as `25/33, 280 YDS, 2 TD`
    #[serde(rename = "displayValue", default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub athlete: Option<AthleteRef>,
    #[serde(default)]
    pub team: Option<TeamRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AthleteRef {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Status {
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(rename = "displayClock", default)]
    pub display_clock: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<StatusType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusType {
    /// `pre`, `in` or `post`
    #[serde(default)]
    pub state: Option<String>,
    /// Human-readable status such as `Scheduled`, `Halftime`, `Final/OT`
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Competitor {
    #[serde(rename = "homeAway", default)]
    pub home_away: Option<String>,
    #[serde(default)]
    pub team: Option<TeamRef>,
    /// A string on the scoreboard, sometimes a number or an object elsewhere
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub records: Vec<RecordSummary>,
    /// Points per period; entries come as `{"value": 7.0}`
    #[serde(default)]
    pub linescores: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordSummary {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Situation {
    #[serde(default)]
    pub possession: Option<String>,
    #[serde(rename = "downDistanceText", default)]
    pub down_distance_text: Option<String>,
}

/// Odds summary embedded in a scoreboard competition
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OddsSummary {
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Venue {
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

/// Body of the per-game odds endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OddsResponse {
    #[serde(default)]
    pub items: Vec<OddsItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OddsItem {
    #[serde(default)]
    pub provider: Option<OddsProvider>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OddsProvider {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
