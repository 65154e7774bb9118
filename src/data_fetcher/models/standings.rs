//! Standings rows as stored on disk and the joined snapshot built from them

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-team record row, one element of `team_records.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecordRow {
    pub team_id: String,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    #[serde(default)]
    pub division_wins: u32,
    #[serde(default)]
    pub division_losses: u32,
    #[serde(default)]
    pub division_ties: u32,
}

/// Per-team division row, one element of `team_divisions.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDivisionRow {
    pub team_id: String,
    pub division_id: String,
    pub division_name: String,
}

/// Body of the team record endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamRecordResponse {
    #[serde(default)]
    pub items: Vec<RecordItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub stats: Vec<RecordStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordStat {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

/// Body of the team groups endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamGroupResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: String,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub division_wins: u32,
    pub division_losses: u32,
    pub division_ties: u32,
    pub division_id: Option<String>,
    pub division_name: Option<String>,
}

impl TeamStanding {
    /// `W-L` or `W-L-T` when the team has ties
    pub fn record_text(&self) -> String {
        format_record(self.wins, self.losses, self.ties)
    }

    pub fn division_record_text(&self) -> String {
        format_record(self.division_wins, self.division_losses, self.division_ties)
    }
}

fn format_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}

/// One division's teams in standings order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionStandings {
    /// `None` collects teams whose division row is missing
    pub division_name: Option<String>,
    pub teams: Vec<TeamStanding>,
}

/// Team id → standing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub teams: BTreeMap<String, TeamStanding>,
}

impl StandingsSnapshot {
    /// Joins record rows with division rows on team id.
    ///
    /// Record rows drive the join: a team without a division row is kept with
    /// no division, a division row without a record row is ignored.
    pub fn join(records: &[TeamRecordRow], divisions: &[TeamDivisionRow]) -> Self {
        let divisions_by_team: HashMap<&str, &TeamDivisionRow> = divisions
            .iter()
            .map(|row| (row.team_id.as_str(), row))
            .collect();

        let teams = records
            .iter()
            .map(|row| {
                let division = divisions_by_team.get(row.team_id.as_str());
                let standing = TeamStanding {
                    team_id: row.team_id.clone(),
                    team_name: row.team_name.clone(),
                    wins: row.wins,
                    losses: row.losses,
                    ties: row.ties,
                    division_wins: row.division_wins,
                    division_losses: row.division_losses,
                    division_ties: row.division_ties,
                    division_id: division.map(|d| d.division_id.clone()),
                    division_name: division.map(|d| d.division_name.clone()),
                };
                (row.team_id.clone(), standing)
            })
            .collect();

        Self { teams }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn get(&self, team_id: &str) -> Option<&TeamStanding> {
        self.teams.get(team_id)
    }

    /// Groups teams by division name. Divisions come out alphabetically with
    /// the no-division group last; teams are ordered by wins descending,
    /// then losses ascending, then name.
    pub fn by_division(&self) -> Vec<DivisionStandings> {
        let mut groups: BTreeMap<Option<String>, Vec<TeamStanding>> = BTreeMap::new();
        for standing in self.teams.values() {
            groups
                .entry(standing.division_name.clone())
                .or_default()
                .push(standing.clone());
        }

        let mut divisions: Vec<DivisionStandings> = groups
            .into_iter()
            .map(|(division_name, mut teams)| {
                teams.sort_by(|a, b| {
                    b.wins
                        .cmp(&a.wins)
                        .then(a.losses.cmp(&b.losses))
                        .then_with(|| a.team_name.cmp(&b.team_name))
                });
                DivisionStandings {
                    division_name,
                    teams,
                }
            })
            .collect();

        // BTreeMap puts None first
        if divisions
            .first()
            .is_some_and(|group| group.division_name.is_none())
        {
            let unassigned = divisions.remove(0);
            divisions.push(unassigned);
        }
        divisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_row(id: &str, name: &str, wins: u32, losses: u32) -> TeamRecordRow {
        TeamRecordRow {
            team_id: id.to_string(),
            team_name: name.to_string(),
            wins,
            losses,
            ties: 0,
            division_wins: 0,
            division_losses: 0,
            division_ties: 0,
        }
    }

    fn division_row(team_id: &str, division: &str) -> TeamDivisionRow {
        TeamDivisionRow {
            team_id: team_id.to_string(),
            division_id: division.to_lowercase().replace(' ', "-"),
            division_name: division.to_string(),
        }
    }

    #[test]
    fn test_join_keeps_team_without_division() {
        let records = vec![record_row("1", "Chiefs", 15, 2), record_row("2", "Bills", 13, 4)];
        let divisions = vec![division_row("1", "AFC West")];

        let snapshot = StandingsSnapshot::join(&records, &divisions);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.get("1").unwrap().division_name.as_deref(),
            Some("AFC West")
        );
        assert!(snapshot.get("2").unwrap().division_name.is_none());
    }

    #[test]
    fn test_join_ignores_division_row_without_record() {
        let records = vec![record_row("1", "Chiefs", 15, 2)];
        let divisions = vec![division_row("1", "AFC West"), division_row("9", "NFC East")];

        let snapshot = StandingsSnapshot::join(&records, &divisions);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_by_division_orders_teams_and_groups() {
        let records = vec![
            record_row("1", "Raiders", 4, 13),
            record_row("2", "Chiefs", 15, 2),
            record_row("3", "Broncos", 10, 7),
            record_row("4", "Chargers", 11, 6),
            record_row("5", "Bills", 13, 4),
            record_row("6", "Orphans", 1, 1),
        ];
        let divisions = vec![
            division_row("1", "AFC West"),
            division_row("2", "AFC West"),
            division_row("3", "AFC West"),
            division_row("4", "AFC West"),
            division_row("5", "AFC East"),
        ];

        let grouped = StandingsSnapshot::join(&records, &divisions).by_division();

        let names: Vec<Option<&str>> = grouped
            .iter()
            .map(|group| group.division_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("AFC East"), Some("AFC West"), None]);

        let west: Vec<&str> = grouped[1]
            .teams
            .iter()
            .map(|team| team.team_name.as_str())
            .collect();
        assert_eq!(west, vec!["Chiefs", "Chargers", "Broncos", "Raiders"]);
    }

    #[test]
    fn test_equal_wins_break_on_losses_then_name() {
        let records = vec![
            record_row("1", "Zeta", 9, 8),
            record_row("2", "Alpha", 9, 8),
            record_row("3", "Mid", 9, 7),
        ];
        let grouped = StandingsSnapshot::join(&records, &[]).by_division();
        let order: Vec<&str> = grouped[0]
            .teams
            .iter()
            .map(|team| team.team_name.as_str())
            .collect();
        assert_eq!(order, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_record_text_shows_ties_only_when_present() {
        let mut standing = StandingsSnapshot::join(&[record_row("1", "A", 8, 8)], &[])
            .teams
            .remove("1")
            .unwrap();
        assert_eq!(standing.record_text(), "8-8");
        standing.ties = 1;
        assert_eq!(standing.record_text(), "8-8-1");
    }
}
