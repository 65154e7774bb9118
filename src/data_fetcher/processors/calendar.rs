//! Season calendar parsing and week selection

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::normalize::scoreboard_events;
use super::time_formatting::parse_upstream_datetime;
use crate::constants::season_type;
use crate::data_fetcher::models::CalendarWeek;
use crate::data_fetcher::models::scoreboard::{CalendarGroup, League};

/// Flattens `leagues[0].calendar[*].entries[*]` into a list of weeks.
///
/// Entries whose dates do not parse are skipped. A payload without leagues
/// yields an empty calendar.
pub fn parse_calendar(payload: &Value) -> Vec<CalendarWeek> {
    let Some(raw_leagues) = payload.get("leagues") else {
        debug!("Events payload has no leagues, calendar is empty");
        return Vec::new();
    };
    let leagues: Vec<League> = match serde_json::from_value(raw_leagues.clone()) {
        Ok(leagues) => leagues,
        Err(e) => {
            warn!("Failed to parse season calendar: {e}");
            return Vec::new();
        }
    };
    let Some(league) = leagues.first() else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    for group in &league.calendar {
        let season_type = group_season_type(group);
        for (position, entry) in group.entries.iter().enumerate() {
            let (Some(start), Some(end)) = (
                parse_upstream_datetime(&entry.start_date),
                parse_upstream_datetime(&entry.end_date),
            ) else {
                debug!("Skipping calendar entry '{}' with bad dates", entry.label);
                continue;
            };
            let week_number = entry
                .value
                .as_deref()
                .and_then(|value| value.parse().ok())
                .unwrap_or(position as u32 + 1);

            weeks.push(CalendarWeek {
                index: weeks.len(),
                label: entry.label.clone(),
                start,
                end,
                week_number,
                season_type,
            });
        }
    }

    debug!("Parsed season calendar with {} weeks", weeks.len());
    weeks
}

/// Season type code of a calendar group.
///
/// The group's `value` decides; without it the label is matched, and
/// anything unrecognized counts as regular season.
fn group_season_type(group: &CalendarGroup) -> u32 {
    if let Some(code) = group.value.as_deref().and_then(|v| v.trim().parse().ok()) {
        return code;
    }
    let label = group.label.as_deref().unwrap_or_default().to_ascii_lowercase();
    if label.starts_with("pre") {
        season_type::PRESEASON
    } else if label.starts_with("post") {
        season_type::POSTSEASON
    } else {
        season_type::REGULAR
    }
}

/// Index of the week containing `now`, or 0 when no week does.
pub fn current_week_index(weeks: &[CalendarWeek], now: DateTime<Utc>) -> usize {
    weeks
        .iter()
        .find(|week| week.contains(now))
        .map(|week| week.index)
        .unwrap_or(0)
}

/// Display label such as `Week 1: 09/05 - 09/11`
pub fn week_label(week: &CalendarWeek) -> String {
    format!(
        "{}: {} - {}",
        week.label,
        week.start.format("%m/%d"),
        week.end.format("%m/%d")
    )
}

/// Raw events of `payload` whose kickoff falls inside `week`.
///
/// Events without a parseable date are left out.
pub fn events_in_week<'a>(payload: &'a Value, week: &CalendarWeek) -> Vec<&'a Value> {
    scoreboard_events(payload)
        .iter()
        .filter(|event| {
            event
                .get("date")
                .and_then(Value::as_str)
                .and_then(parse_upstream_datetime)
                .is_some_and(|date| week.contains(date))
        })
        .collect()
}
