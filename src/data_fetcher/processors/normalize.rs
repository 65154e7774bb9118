//! Turns raw scoreboard events into [`GameRecord`]s
//!
//! Malformed events are dropped one by one. Only a payload with no events at
//! all is treated as a failed cycle, and that decision belongs to the caller.

use serde_json::Value;
use tracing::debug;

use super::game_status::{determine_game_status, status_detail};
use super::time_formatting::parse_upstream_datetime;
use crate::data_fetcher::models::scoreboard::{Competition, Competitor, Event};
use crate::data_fetcher::models::{GameRecord, GameStatus, TeamLine};

/// Raw events of a scoreboard or events-by-year payload.
///
/// Returns an empty list when the payload has no `events` array.
pub fn scoreboard_events(payload: &Value) -> &[Value] {
    payload
        .get("events")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Normalizes one raw event. Odds are left empty for the odds resolver.
///
/// # Returns
/// * `Some(GameRecord)` - The event had an id, a status, a first competition
///   and two competitors with team ids
/// * `None` - Anything required was missing or had the wrong type
pub fn normalize_event(raw: &Value) -> Option<GameRecord> {
    let event: Event = match serde_json::from_value(raw.clone()) {
        Ok(event) => event,
        Err(e) => {
            debug!("Skipping event that does not deserialize: {e}");
            return None;
        }
    };

    let Some(game_id) = event.id.clone().filter(|id| !id.is_empty()) else {
        debug!("Skipping event without an id");
        return None;
    };

    let Some(competition) = event.competitions.first() else {
        debug!("Skipping event {game_id}: no competition");
        return None;
    };

    let Some((home, away)) = split_home_away(competition) else {
        debug!("Skipping event {game_id}: competitors missing");
        return None;
    };
    let (Some(home), Some(away)) = (team_line(home), team_line(away)) else {
        debug!("Skipping event {game_id}: competitor without a team id");
        return None;
    };

    // The competition carries the live status on the scoreboard; the event
    // copy is used by the events-by-year payload
    let Some(status) = competition.status.as_ref().or(event.status.as_ref()) else {
        debug!("Skipping event {game_id}: no status");
        return None;
    };
    let Some(game_status) = determine_game_status(status) else {
        debug!("Skipping event {game_id}: unrecognized status");
        return None;
    };

    let is_live = game_status == GameStatus::InProgress;
    let situation = competition.situation.as_ref().filter(|_| is_live);

    Some(GameRecord {
        game_id,
        home,
        away,
        status: game_status,
        status_detail: status_detail(status, game_status),
        period: status.period.filter(|_| game_status != GameStatus::Scheduled),
        clock: status
            .display_clock
            .clone()
            .filter(|_| game_status == GameStatus::InProgress),
        possession: situation.and_then(|s| s.possession.clone()),
        down_distance: situation.and_then(|s| s.down_distance_text.clone()),
        odds: None,
        kickoff: event.date.as_deref().and_then(parse_upstream_datetime),
        venue: competition
            .venue
            .as_ref()
            .and_then(|venue| venue.full_name.clone()),
        broadcast: broadcast_name(competition),
        headline: competition
            .headlines
            .first()
            .and_then(|h| h.short_link_text.clone().or_else(|| h.description.clone())),
    })
}

/// Normalizes every event of a payload, dropping the malformed ones.
pub fn normalize_events(payload: &Value) -> Vec<GameRecord> {
    let raw_events = scoreboard_events(payload);
    let records: Vec<GameRecord> = raw_events.iter().filter_map(normalize_event).collect();
    if records.len() < raw_events.len() {
        debug!(
            "Normalized {} of {} events, {} skipped as malformed",
            records.len(),
            raw_events.len(),
            raw_events.len() - records.len()
        );
    }
    records
}

/// Sorts in presentation order: in progress, then scheduled, then final.
/// The sort is stable, so upstream order is kept within each group.
pub fn sort_for_display(records: &mut [GameRecord]) {
    records.sort_by_key(|record| record.status.display_rank());
}

/// Whether any record is currently in progress
pub fn has_live_games(records: &[GameRecord]) -> bool {
    records.iter().any(GameRecord::is_live)
}

/// The short `broadcast` field, or the first network of `broadcasts`
fn broadcast_name(competition: &Competition) -> Option<String> {
    competition
        .broadcast
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            competition
                .broadcasts
                .iter()
                .flat_map(|b| b.names.iter())
                .next()
                .cloned()
        })
}

/// Home and away competitors, by side marker or listing order
pub(crate) fn split_home_away(competition: &Competition) -> Option<(&Competitor, &Competitor)> {
    let competitors = &competition.competitors;
    if competitors.len() < 2 {
        return None;
    }

    let by_side = |side: &str| {
        competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(side))
    };
    match (by_side("home"), by_side("away")) {
        (Some(home), Some(away)) => Some((home, away)),
        // Listing order is home first when the side marker is missing
        _ => Some((&competitors[0], &competitors[1])),
    }
}

pub(crate) fn team_line(competitor: &Competitor) -> Option<TeamLine> {
    let team = competitor.team.as_ref()?;
    let team_id = team.id.clone().filter(|id| !id.is_empty())?;
    let name = team
        .display_name
        .clone()
        .or_else(|| team.abbreviation.clone())
        .unwrap_or_else(|| team_id.clone());

    Some(TeamLine {
        team_id,
        name,
        abbreviation: team.abbreviation.clone(),
        score: competitor.score.as_ref().and_then(parse_score),
        record: competitor
            .records
            .first()
            .and_then(|record| record.summary.clone()),
    })
}

/// Reads a score that may come as `"24"`, `24`, or `{"value": 24.0}`.
pub fn parse_score(value: &Value) -> Option<u16> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u16::try_from(n).ok()),
        Value::Object(map) => map.get("value").and_then(parse_score),
        _ => None,
    }
}
