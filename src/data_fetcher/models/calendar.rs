use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One selectable week of the season calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    /// Position in the flattened calendar, starting at 0
    pub index: usize,
    /// Upstream label such as `Week 1` or `Wild Card`
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// 1-based week number inside its season part, used by the week scoreboard
    pub week_number: u32,
    /// Season part the week belongs to; preseason and regular season both
    /// have a week 1
    pub season_type: u32,
}

impl CalendarWeek {
    /// Inclusive on both ends
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}
