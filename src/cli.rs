use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Determines if the application runs a single command and exits instead of
/// watching the scoreboard.
/// One-shot mode is used when any of these conditions are met:
/// - --once flag is set
/// - a week, game, standings or roster view is requested
/// - config operations are requested
pub fn is_one_shot_mode(args: &Args) -> bool {
    args.once
        || args.week.is_some()
        || args.game.is_some()
        || args.standings
        || args.refresh_standings
        || args.roster.is_some()
        || is_config_command(args)
}

/// Whether the arguments only touch the config file
pub fn is_config_command(args: &Args) -> bool {
    args.new_api_key.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// Live NFL scoreboard
///
/// Polls the scoreboard of the day and prints it again whenever a score,
/// clock or status changes.
///
/// In watch mode (default):
/// - The scoreboard is checked every 15 seconds while a game is live
/// - Every 5 minutes otherwise
/// - Pregame odds are refreshed once an hour
/// - Press Ctrl+C to quit
#[derive(Parser, Debug, Default)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Show the scoreboard once and exit. Useful for scripts or quick score checks.
    #[arg(short, long)]
    pub once: bool,

    /// Show the scoreboard of a specific date in YYYY-MM-DD format instead of today.
    #[arg(long = "date", short = 'd', help_heading = "Views")]
    pub date: Option<String>,

    /// Show all games of a season week. The index is zero-based and follows
    /// the season calendar, preseason weeks included.
    #[arg(long = "week", short = 'w', value_name = "INDEX", help_heading = "Views")]
    pub week: Option<usize>,

    /// Show scoring plays and odds for one game.
    #[arg(long = "game", short = 'g', value_name = "GAME_ID", help_heading = "Views")]
    pub game: Option<String>,

    /// Show the saved division standings.
    #[arg(long = "standings", short = 's', help_heading = "Views")]
    pub standings: bool,

    /// Fetch team records and divisions from the API, save them and show the standings.
    #[arg(long = "refresh-standings", help_heading = "Views")]
    pub refresh_standings: bool,

    /// Show the roster of a team.
    #[arg(long = "roster", value_name = "TEAM_ID", help_heading = "Views")]
    pub roster: Option<String>,

    /// Update the API key in config. Will prompt for the key if not provided.
    #[arg(
        long = "set-api-key",
        help_heading = "Configuration",
        value_name = "API_KEY",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub new_api_key: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug mode. Logs are also written to stdout, and the watch
    /// mode prints cache statistics with every update.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
