//! Plain-text rendering of snapshots, week views, game detail and standings
//!
//! Every function builds a `String` so the binary decides where it goes and
//! tests can assert on it directly.

use std::fmt::Write as _;

use crate::data_fetcher::models::{
    CalendarWeek, GameDetail, GameRecord, GameStatus, LineScore, RosterEntry, StandingsSnapshot,
};
use crate::data_fetcher::processors::{format_game_clock, format_kickoff, week_label};
use crate::polling::Snapshot;

const TEAM_COLUMN_WIDTH: usize = 24;
const SEPARATOR: &str = "----------------------------------------------------------";

/// Score text for one side: the number, or `-` before kickoff
fn score_cell(record: &GameRecord, score: Option<u16>) -> String {
    match (record.status, score) {
        (GameStatus::Scheduled, _) | (_, None) => "-".to_string(),
        (_, Some(score)) => score.to_string(),
    }
}

fn team_cell(name: &str, team_record: Option<&str>, has_ball: bool) -> String {
    let mut cell = name.to_string();
    if let Some(summary) = team_record {
        let _ = write!(cell, " ({summary})");
    }
    if has_ball {
        cell.push_str(" *");
    }
    cell
}

/// Status column: kickoff for scheduled games, quarter and clock for live
/// ones, the upstream description for finished ones
fn status_cell(record: &GameRecord) -> String {
    match record.status {
        GameStatus::Scheduled => record
            .kickoff
            .map(format_kickoff)
            .unwrap_or_else(|| record.status_detail.clone()),
        GameStatus::InProgress => {
            let clock = format_game_clock(record.period, record.clock.as_deref());
            if clock.is_empty() {
                record.status_detail.clone()
            } else {
                clock
            }
        }
        GameStatus::Final => record.status_detail.clone(),
    }
}

/// Renders one game as two team lines followed by its status line.
pub fn render_game(record: &GameRecord) -> String {
    let possession = record.possession_side().map(|team| team.team_id.as_str());
    let away = team_cell(
        &record.away.name,
        record.away.record.as_deref(),
        possession == Some(record.away.team_id.as_str()),
    );
    let home = team_cell(
        &record.home.name,
        record.home.record.as_deref(),
        possession == Some(record.home.team_id.as_str()),
    );

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{away:<width$} {:>3}",
        score_cell(record, record.away.score),
        width = TEAM_COLUMN_WIDTH
    );
    let _ = writeln!(
        out,
        "{home:<width$} {:>3}",
        score_cell(record, record.home.score),
        width = TEAM_COLUMN_WIDTH
    );

    let mut status = status_cell(record);
    if let Some(down_distance) = &record.down_distance {
        let _ = write!(status, " | {down_distance}");
    }
    if let Some(odds) = &record.odds {
        let _ = write!(status, " | Odds: {odds}");
    }
    if let Some(broadcast) = record.broadcast.as_ref().filter(|_| !record.is_live()) {
        let _ = write!(status, " | {broadcast}");
    }
    let _ = writeln!(out, "  {status}");
    if let Some(headline) = &record.headline {
        let _ = writeln!(out, "  {headline}");
    }
    out
}

fn render_games(out: &mut String, records: &[GameRecord]) {
    if records.is_empty() {
        let _ = writeln!(out, "No games.");
        return;
    }
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render_game(record));
    }
}

/// Renders a poll snapshot with a header carrying the poll state.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "NFL SCOREBOARD  {}  [{}]",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.state
    );
    let _ = writeln!(out, "{SEPARATOR}");
    render_games(&mut out, &snapshot.records);
    out
}

/// Renders the games of one calendar week.
pub fn render_week(week: &CalendarWeek, records: &[GameRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", week_label(week));
    let _ = writeln!(out, "{SEPARATOR}");
    render_games(&mut out, records);
    out
}

/// Renders odds, line score, leaders and the scoring summary of one game.
pub fn render_game_detail(detail: &GameDetail) -> String {
    let mut out = String::new();
    let status = detail
        .status
        .map_or_else(|| "Unknown".to_string(), |status| status.to_string());
    let _ = writeln!(out, "Game {} ({status})", detail.game_id);
    let _ = writeln!(
        out,
        "Odds: {}",
        detail.odds.as_deref().unwrap_or("not available")
    );
    let _ = writeln!(out, "{SEPARATOR}");

    if let Some(line_score) = &detail.line_score {
        render_line_score(&mut out, line_score);
        let _ = writeln!(out, "{SEPARATOR}");
    }
    if !detail.leaders.is_empty() {
        for leader in &detail.leaders {
            let _ = writeln!(
                out,
                "{:<18} {:<20} {}",
                leader.category, leader.athlete, leader.stat_line
            );
        }
        let _ = writeln!(out, "{SEPARATOR}");
    }

    if detail.scoring_plays.is_empty() {
        let _ = writeln!(out, "No scoring plays.");
        return out;
    }

    for play in &detail.scoring_plays {
        let when = format_game_clock(play.period, Some(play.clock.as_str()));
        let team = play.team_abbreviation.as_deref().unwrap_or("-");
        let score = match (play.away_score, play.home_score) {
            (Some(away), Some(home)) => format!("{away}-{home}"),
            _ => String::new(),
        };
        let _ = writeln!(out, "{when:<10} {team:<4} {score:>7}  {}", play.text);
    }
    out
}

fn render_line_score(out: &mut String, line_score: &LineScore) {
    let periods = line_score.period_count();
    let mut header = format!("{:<6}", "");
    for period in 1..=periods {
        let _ = write!(header, "{:>4}", period_header(period));
    }
    let _ = writeln!(out, "{header}{:>5}", "T");

    for row in [&line_score.away, &line_score.home] {
        let mut line = format!("{:<6}", row.team);
        for period in 0..periods {
            match row.periods.get(period) {
                Some(points) => {
                    let _ = write!(line, "{points:>4}");
                }
                None => line.push_str("   -"),
            }
        }
        let total = row.total.map_or_else(|| "-".to_string(), |t| t.to_string());
        let _ = writeln!(out, "{line}{total:>5}");
    }
}

/// `1` to `4`, then `OT`, `OT2` and so on
fn period_header(period: usize) -> String {
    match period {
        1..=4 => period.to_string(),
        5 => "OT".to_string(),
        n => format!("OT{}", n - 4),
    }
}

/// Renders standings grouped by division.
pub fn render_standings(standings: &StandingsSnapshot) -> String {
    if standings.is_empty() {
        return "No standings saved. Run with --refresh-standings first.\n".to_string();
    }

    let mut out = String::new();
    for (i, division) in standings.by_division().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{}",
            division.division_name.as_deref().unwrap_or("No division")
        );
        let _ = writeln!(out, "{SEPARATOR}");
        for team in &division.teams {
            let _ = writeln!(
                out,
                "{:<width$} {:>8}   div {:>6}",
                team.team_name,
                team.record_text(),
                team.division_record_text(),
                width = TEAM_COLUMN_WIDTH
            );
        }
    }
    out
}

/// Renders a team roster, one athlete per line.
pub fn render_roster(team_id: &str, roster: &[RosterEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Roster for team {team_id}");
    let _ = writeln!(out, "{SEPARATOR}");
    if roster.is_empty() {
        let _ = writeln!(out, "No athletes listed.");
        return out;
    }
    for entry in roster {
        let _ = writeln!(
            out,
            "{:>3}  {:<4} {}",
            entry.jersey.as_deref().unwrap_or(""),
            entry.position.as_deref().unwrap_or(""),
            entry.name
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::game::test_support::record;
    use crate::data_fetcher::models::{GameLeader, LineScoreRow, ScoringPlay};
    use crate::data_fetcher::models::{TeamDivisionRow, TeamRecordRow};

    #[test]
    fn test_scheduled_game_hides_scores() {
        let mut game = record("1", GameStatus::Scheduled);
        game.odds = Some("KC -3.5".to_string());
        let text = render_game(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Team AWY"));
        assert!(lines[0].ends_with('-'));
        assert!(lines[1].starts_with("Team HOM"));
        assert!(lines[2].contains("Odds: KC -3.5"));
    }

    #[test]
    fn test_live_game_shows_clock_and_possession() {
        let mut game = record("1", GameStatus::InProgress);
        game.home.score = Some(14);
        game.away.score = Some(7);
        game.period = Some(3);
        game.clock = Some("7:41".to_string());
        game.possession = Some("1".to_string());
        game.down_distance = Some("2nd & 5 at KC 40".to_string());

        let text = render_game(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with(" 7"));
        assert!(lines[1].contains("Team HOM *"));
        assert!(lines[1].ends_with("14"));
        assert_eq!(lines[2].trim(), "Q3 7:41 | 2nd & 5 at KC 40");
    }

    #[test]
    fn test_final_game_uses_status_detail() {
        let mut game = record("1", GameStatus::Final);
        game.status_detail = "Final/OT".to_string();
        game.home.score = Some(20);
        game.away.score = Some(23);
        let text = render_game(&game);
        assert!(text.lines().nth(2).unwrap().contains("Final/OT"));
    }

    #[test]
    fn test_game_detail_lists_plays() {
        let detail = GameDetail {
            game_id: "401".to_string(),
            status: Some(GameStatus::Final),
            odds: None,
            scoring_plays: vec![ScoringPlay {
                team_id: Some("12".to_string()),
                team_abbreviation: Some("KC".to_string()),
                period: Some(1),
                clock: "4:02".to_string(),
                text: "Touchdown".to_string(),
                away_score: Some(0),
                home_score: Some(7),
            }],
            line_score: None,
            leaders: Vec::new(),
        };
        let text = render_game_detail(&detail);
        assert!(text.starts_with("Game 401 (Final)"));
        assert!(text.contains("Odds: not available"));
        assert!(text.contains("Q1 4:02"));
        assert!(text.contains("0-7  Touchdown"));
    }

    #[test]
    fn test_game_detail_line_score_and_leaders() {
        let detail = GameDetail {
            game_id: "401".to_string(),
            status: None,
            odds: Some("KC -3.5".to_string()),
            scoring_plays: Vec::new(),
            line_score: Some(LineScore {
                away: LineScoreRow {
                    team: "BAL".to_string(),
                    periods: vec![7, 6, 0, 7],
                    total: Some(20),
                },
                home: LineScoreRow {
                    team: "KC".to_string(),
                    periods: vec![7, 6, 7, 7, 3],
                    total: Some(30),
                },
            }),
            leaders: vec![GameLeader {
                category: "Passing Leader".to_string(),
                athlete: "P. Mahomes".to_string(),
                team_id: Some("12".to_string()),
                stat_line: "20/28, 291 YDS".to_string(),
            }],
        };
        let text = render_game_detail(&detail);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Game 401 (Unknown)");
        assert_eq!(lines[1], "Odds: KC -3.5");
        assert_eq!(lines[3], "         1   2   3   4  OT    T");
        assert_eq!(lines[4], "BAL      7   6   0   7   -   20");
        assert_eq!(lines[5], "KC       7   6   7   7   3   30");
        assert!(text.contains("P. Mahomes"));
        assert!(text.contains("20/28, 291 YDS"));
        assert!(text.ends_with("No scoring plays.\n"));
    }

    #[test]
    fn test_broadcast_and_headline_lines() {
        let mut game = record("1", GameStatus::Scheduled);
        game.broadcast = Some("CBS".to_string());
        let text = render_game(&game);
        assert!(text.lines().nth(2).unwrap().ends_with("| CBS"));

        let mut game = record("1", GameStatus::Final);
        game.broadcast = Some("CBS".to_string());
        game.headline = Some("Chiefs hold on".to_string());
        let text = render_game(&game);
        assert!(text.lines().nth(2).unwrap().ends_with("| CBS"));
        assert_eq!(text.lines().nth(3).unwrap().trim(), "Chiefs hold on");

        game.status = GameStatus::InProgress;
        assert!(!render_game(&game).contains("CBS"));
    }

    #[test]
    fn test_standings_grouped_by_division() {
        let records = vec![TeamRecordRow {
            team_id: "12".to_string(),
            team_name: "Kansas City Chiefs".to_string(),
            wins: 15,
            losses: 2,
            ties: 0,
            division_wins: 5,
            division_losses: 1,
            division_ties: 0,
        }];
        let divisions = vec![TeamDivisionRow {
            team_id: "12".to_string(),
            division_id: "6".to_string(),
            division_name: "AFC West".to_string(),
        }];
        let text = render_standings(&StandingsSnapshot::join(&records, &divisions));
        assert!(text.starts_with("AFC West"));
        assert!(text.contains("Kansas City Chiefs"));
        assert!(text.contains("15-2"));
        assert!(text.contains("5-1"));
    }

    #[test]
    fn test_empty_standings_hint() {
        let text = render_standings(&StandingsSnapshot::default());
        assert!(text.contains("--refresh-standings"));
    }
}
