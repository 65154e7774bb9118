//! Row extraction for the standings refresh

use serde_json::Value;
use tracing::debug;

use crate::data_fetcher::models::scoreboard::TeamRef;
use crate::data_fetcher::models::standings::{RecordItem, TeamGroupResponse, TeamRecordResponse};
use crate::data_fetcher::models::{TeamDivisionRow, TeamRecordRow};

/// A team as listed by the team list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedTeam {
    pub team_id: String,
    pub name: String,
}

/// Teams of the team list payload.
///
/// Accepts a top-level `teams` array of team objects or of `{"team": {..}}`
/// wrappers, and the nested `sports[0].leagues[0].teams` form.
pub fn parse_team_list(payload: &Value) -> Vec<ListedTeam> {
    let teams = payload.get("teams").and_then(Value::as_array).or_else(|| {
        payload
            .pointer("/sports/0/leagues/0/teams")
            .and_then(Value::as_array)
    });
    let Some(teams) = teams else {
        debug!("Team list payload has no teams array");
        return Vec::new();
    };

    teams
        .iter()
        .filter_map(|entry| {
            let team = entry.get("team").unwrap_or(entry);
            let team: TeamRef = serde_json::from_value(team.clone()).ok()?;
            let team_id = team.id.filter(|id| !id.is_empty())?;
            let name = team
                .display_name
                .or(team.abbreviation)
                .unwrap_or_else(|| team_id.clone());
            Some(ListedTeam { team_id, name })
        })
        .collect()
}

/// Record row for `team` from the team record payload.
///
/// Uses the overall record item. Counts come from the `stats` list, falling
/// back to the `W-L-T` summary when stats are missing. Returns `None` when
/// neither yields wins and losses.
pub fn parse_record_row(team: &ListedTeam, payload: &Value) -> Option<TeamRecordRow> {
    let response: TeamRecordResponse = serde_json::from_value(payload.clone()).ok()?;
    let overall = response
        .items
        .iter()
        .find(|item| item.kind.as_deref() == Some("total") || item.name.as_deref() == Some("overall"))
        .or_else(|| response.items.first())?;

    let (wins, losses, ties) = match (stat(overall, "wins"), stat(overall, "losses")) {
        (Some(wins), Some(losses)) => (wins, losses, stat(overall, "ties").unwrap_or(0)),
        _ => parse_summary(overall.summary.as_deref()?)?,
    };

    Some(TeamRecordRow {
        team_id: team.team_id.clone(),
        team_name: team.name.clone(),
        wins,
        losses,
        ties,
        division_wins: stat(overall, "divisionWins").unwrap_or(0),
        division_losses: stat(overall, "divisionLosses").unwrap_or(0),
        division_ties: stat(overall, "divisionTies").unwrap_or(0),
    })
}

/// Division row for `team` from the team groups payload.
pub fn parse_division_row(team: &ListedTeam, payload: &Value) -> Option<TeamDivisionRow> {
    let group: TeamGroupResponse = serde_json::from_value(payload.clone()).ok()?;
    let division_id = group.id?;
    let division_name = group.name.or(group.abbreviation)?;
    Some(TeamDivisionRow {
        team_id: team.team_id.clone(),
        division_id,
        division_name,
    })
}

fn stat(item: &RecordItem, name: &str) -> Option<u32> {
    item.stats
        .iter()
        .find(|stat| stat.name == name)
        .filter(|stat| stat.value >= 0.0)
        .map(|stat| stat.value.round() as u32)
}

/// Parses `W-L` or `W-L-T`
fn parse_summary(summary: &str) -> Option<(u32, u32, u32)> {
    let parts = summary
        .split('-')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<Vec<u32>>>()?;
    match parts.as_slice() {
        [wins, losses] => Some((*wins, *losses, 0)),
        [wins, losses, ties] => Some((*wins, *losses, *ties)),
        _ => None,
    }
}
