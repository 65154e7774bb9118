// src/main.rs
use clap::Parser;
use nfl_scoreboard::app::{self, App};
use nfl_scoreboard::cli::{Args, is_config_command, is_one_shot_mode};
use nfl_scoreboard::commands;
use nfl_scoreboard::config::Config;
use nfl_scoreboard::error::AppError;
use nfl_scoreboard::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let day = commands::validate_args(&args)?;

    // Configuration operations run before the config is validated so a
    // broken file can still be fixed from the command line
    if args.list_config {
        return commands::handle_list_config_command().await;
    }
    if is_config_command(&args) {
        return commands::handle_config_update_command(&args).await;
    }

    let config = Config::load().await?;

    let (log_file_path, _guard) = setup_logging(
        &args,
        config.log_file_path.as_deref(),
        &Config::get_log_dir_path(),
    )
    .await?;
    tracing::info!(
        "Starting {} {} (season {}, logging to {log_file_path})",
        nfl_scoreboard::NAME,
        nfl_scoreboard::VERSION,
        config.season_year
    );

    let app = App::new(config)?;

    if !is_one_shot_mode(&args) {
        return app::run_watch(&app, &args, day).await;
    }

    if let Some(index) = args.week {
        commands::handle_week_command(&app, index).await
    } else if let Some(game_id) = &args.game {
        commands::handle_game_command(&app, game_id, day).await
    } else if args.standings || args.refresh_standings {
        commands::handle_standings_command(&app, args.refresh_standings).await
    } else if let Some(team_id) = &args.roster {
        commands::handle_roster_command(&app, team_id).await
    } else {
        commands::handle_once_command(&app, day).await
    }
}
