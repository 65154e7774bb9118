pub mod calendar;
pub mod details;
pub mod game_status;
pub mod normalize;
pub mod odds;
pub mod standings;
pub mod time_formatting;

pub use calendar::{current_week_index, events_in_week, parse_calendar, week_label};
pub use details::{find_event, parse_leaders, parse_line_score, parse_roster, parse_scoring_plays};
pub use game_status::determine_game_status;
pub use normalize::{
    has_live_games, normalize_event, normalize_events, scoreboard_events, sort_for_display,
};
pub use odds::{OddsResolver, select_provider_line};
pub use time_formatting::{format_game_clock, format_kickoff, parse_upstream_datetime};
