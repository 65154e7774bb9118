use crate::app::App;
use crate::cli::Args;
use crate::config::Config;
use crate::config::user_prompts::prompt_for_api_key;
use crate::display;
use crate::error::AppError;
use crate::polling::TickOutcome;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together, and the
/// parsed `--date` when one was given.
pub fn validate_args(args: &Args) -> Result<Option<NaiveDate>, AppError> {
    if args.standings && args.refresh_standings {
        return Err(AppError::config_error(
            "Use either --standings or --refresh-standings, not both",
        ));
    }
    if args.date.is_some() && args.week.is_some() {
        return Err(AppError::config_error(
            "Cannot use both --date and --week; a week view already covers its dates",
        ));
    }

    args.date
        .as_deref()
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                AppError::datetime_parse_error(format!(
                    "Invalid date '{date}', expected YYYY-MM-DD: {e}"
                ))
            })
        })
        .transpose()
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-api-key, --set-log-file, --clear-log-file).
///
/// Updates configuration based on the provided arguments and saves changes.
/// A missing config file starts from defaults instead of prompting.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_key) = &args.new_api_key {
        config.api_key = if new_key.is_empty() {
            prompt_for_api_key().await?
        } else {
            new_key.clone()
        };
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Handles the --once command.
///
/// Loads the season calendar, runs a single reconciliation cycle and prints
/// the result. An empty or failed scoreboard prints a notice instead of an
/// error.
pub async fn handle_once_command(app: &App, day: Option<NaiveDate>) -> Result<(), AppError> {
    let mut reconciler = app.reconciler(day);
    if let Err(e) = reconciler.bootstrap().await {
        warn!("Season calendar unavailable: {e}");
        println!("Could not load the season calendar: {e}");
        return Ok(());
    }

    match reconciler.tick().await {
        TickOutcome::Updated(snapshot) => print!("{}", display::render_snapshot(&snapshot)),
        TickOutcome::NoUpdate => println!("No games on the scoreboard."),
    }
    Ok(())
}

/// Handles the --week command.
pub async fn handle_week_command(app: &App, index: usize) -> Result<(), AppError> {
    let mut reconciler = app.reconciler(None);
    reconciler.bootstrap().await?;

    let records = reconciler.week_view(index).await?;
    let Some(week) = reconciler.calendar().get(index) else {
        return Err(AppError::config_error(format!(
            "Week index {index} is outside the season calendar"
        )));
    };
    print!("{}", display::render_week(week, &records));
    Ok(())
}

/// Handles the --game command.
///
/// The odds decision uses the game's status from today's scoreboard when
/// the game is on it, and the season's events otherwise.
pub async fn handle_game_command(
    app: &App,
    game_id: &str,
    day: Option<NaiveDate>,
) -> Result<(), AppError> {
    let mut reconciler = app.reconciler(day);
    let last_known = match reconciler.bootstrap().await {
        Ok(()) => match reconciler.tick().await {
            TickOutcome::Updated(snapshot) => snapshot.status_of(game_id),
            TickOutcome::NoUpdate => None,
        },
        Err(e) => {
            warn!("Skipping scoreboard lookup for game {game_id}: {e}");
            None
        }
    };
    info!("Game {game_id} last known status: {last_known:?}");

    let detail = app.details.detail(game_id, last_known).await?;
    print!("{}", display::render_game_detail(&detail));
    Ok(())
}

/// Handles the --standings and --refresh-standings commands.
pub async fn handle_standings_command(app: &App, refresh: bool) -> Result<(), AppError> {
    let standings = if refresh {
        let standings = app.standings.refresh().await?;
        println!("Standings refreshed for {} teams.\n", standings.len());
        standings
    } else {
        app.standings.load()?
    };
    print!("{}", display::render_standings(&standings));
    Ok(())
}

/// Handles the --roster command.
pub async fn handle_roster_command(app: &App, team_id: &str) -> Result<(), AppError> {
    let roster = app.details.team_roster(team_id).await?;
    print!("{}", display::render_roster(team_id, &roster));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_validate_args_parses_date() {
        let args = Args::parse_from(["nfl_scoreboard", "--date", "2024-09-08"]);
        assert_eq!(
            validate_args(&args).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 8)
        );
    }

    #[test]
    fn test_validate_args_rejects_bad_date() {
        let args = Args::parse_from(["nfl_scoreboard", "--date", "09/08/2024"]);
        assert!(matches!(
            validate_args(&args),
            Err(AppError::DateTimeParse(_))
        ));
    }

    #[test]
    fn test_validate_args_rejects_conflicts() {
        let args = Args::parse_from(["nfl_scoreboard", "--standings", "--refresh-standings"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["nfl_scoreboard", "--date", "2024-09-08", "--week", "1"]);
        assert!(validate_args(&args).is_err());
    }
}
