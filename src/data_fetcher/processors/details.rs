//! Scoring play, line score, leader and roster extraction for the on-demand
//! detail views

use serde_json::Value;
use tracing::debug;

use super::normalize::{parse_score, scoreboard_events, split_home_away, team_line};
use crate::data_fetcher::models::details::{RawScoringPlay, RosterAthlete};
use crate::data_fetcher::models::scoreboard::{Competitor, Event};
use crate::data_fetcher::models::{GameLeader, LineScore, LineScoreRow, RosterEntry, ScoringPlay};

/// Raw event with id `game_id` in a scoreboard or events-by-year payload
pub fn find_event<'a>(payload: &'a Value, game_id: &str) -> Option<&'a Value> {
    scoreboard_events(payload)
        .iter()
        .find(|event| event.get("id").and_then(Value::as_str) == Some(game_id))
}

/// Points per period of both sides.
///
/// Returns `None` before kickoff, when neither competitor has line scores.
pub fn parse_line_score(raw_event: &Value) -> Option<LineScore> {
    let event: Event = serde_json::from_value(raw_event.clone()).ok()?;
    let competition = event.competitions.first()?;
    let (home, away) = split_home_away(competition)?;
    if home.linescores.is_empty() && away.linescores.is_empty() {
        return None;
    }

    Some(LineScore {
        away: line_score_row(away, "Away"),
        home: line_score_row(home, "Home"),
    })
}

fn line_score_row(competitor: &Competitor, fallback: &str) -> LineScoreRow {
    let line = team_line(competitor);
    LineScoreRow {
        team: line
            .as_ref()
            .map(|l| l.short_name().to_string())
            .unwrap_or_else(|| fallback.to_string()),
        periods: competitor
            .linescores
            .iter()
            .map(|value| parse_score(value).unwrap_or(0))
            .collect(),
        total: line.and_then(|l| l.score),
    }
}

/// Top performer of each leader category, in feed order.
///
/// Categories without a named athlete are skipped.
pub fn parse_leaders(raw_event: &Value) -> Vec<GameLeader> {
    let Ok(event) = serde_json::from_value::<Event>(raw_event.clone()) else {
        return Vec::new();
    };
    let Some(competition) = event.competitions.first() else {
        return Vec::new();
    };

    competition
        .leaders
        .iter()
        .filter_map(|category| {
            let top = category.leaders.first()?;
            let athlete = top.athlete.as_ref()?;
            let name = athlete
                .short_name
                .clone()
                .or_else(|| athlete.display_name.clone())?;
            Some(GameLeader {
                category: category
                    .display_name
                    .clone()
                    .or_else(|| category.name.clone())
                    .unwrap_or_default(),
                athlete: name,
                team_id: top.team.as_ref().and_then(|t| t.id.clone()),
                stat_line: top.display_value.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Scoring plays of a game in feed order.
///
/// A payload without `scoringPlays` has none yet; plays that fail to parse are
/// dropped individually.
pub fn parse_scoring_plays(payload: &Value) -> Vec<ScoringPlay> {
    let Some(raw_plays) = payload.get("scoringPlays").and_then(Value::as_array) else {
        return Vec::new();
    };

    raw_plays
        .iter()
        .filter_map(|raw| match serde_json::from_value::<RawScoringPlay>(raw.clone()) {
            Ok(play) => Some(play),
            Err(e) => {
                debug!("Skipping scoring play that does not parse: {e}");
                None
            }
        })
        .map(|play| ScoringPlay {
            team_id: play.team.as_ref().and_then(|t| t.id.clone()),
            team_abbreviation: play.team.as_ref().and_then(|t| t.abbreviation.clone()),
            period: play.period.and_then(|p| p.number),
            clock: play
                .clock
                .and_then(|c| c.display_value)
                .unwrap_or_default(),
            text: play.text.unwrap_or_default(),
            away_score: play.away_score,
            home_score: play.home_score,
        })
        .collect()
}

/// Roster entries, flattening position groups when the feed nests them.
pub fn parse_roster(payload: &Value) -> Vec<RosterEntry> {
    let Some(raw_athletes) = payload.get("athletes").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for raw in raw_athletes {
        match serde_json::from_value::<RosterAthlete>(raw.clone()) {
            Ok(athlete) => collect_athletes(&athlete, &mut entries),
            Err(e) => debug!("Skipping roster entry that does not parse: {e}"),
        }
    }
    entries
}

fn collect_athletes(athlete: &RosterAthlete, entries: &mut Vec<RosterEntry>) {
    if !athlete.items.is_empty() {
        for item in &athlete.items {
            collect_athletes(item, entries);
        }
        return;
    }

    if let Some(name) = &athlete.display_name {
        entries.push(RosterEntry {
            name: name.clone(),
            position: athlete.position.as_ref().and_then(position_abbreviation),
            jersey: athlete.jersey.clone(),
        });
    }
}

fn position_abbreviation(position: &Value) -> Option<String> {
    match position {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map
            .get("abbreviation")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
