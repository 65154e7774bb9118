pub mod calendar;
pub mod details;
pub mod game;
pub mod scoreboard;
pub mod standings;

pub use calendar::CalendarWeek;
pub use details::{GameDetail, GameLeader, LineScore, LineScoreRow, RosterEntry, ScoringPlay};
pub use game::{GameRecord, GameStatus, TeamLine};
pub use scoreboard::{Event, OddsResponse, ScoreboardResponse};
pub use standings::{
    DivisionStandings, StandingsSnapshot, TeamDivisionRow, TeamRecordRow, TeamStanding,
};
