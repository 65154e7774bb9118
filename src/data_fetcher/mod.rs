pub mod api;
pub mod cache;
pub mod game_detail;
pub mod models;
pub mod odds_ledger;
pub mod persistence;
pub mod processors;
pub mod standings;

pub use api::{EndpointRequest, UpstreamClient};
pub use cache::ResultCache;
pub use game_detail::GameDetailService;
pub use models::{GameRecord, GameStatus};
pub use odds_ledger::OddsLedger;
pub use persistence::{JsonFileStore, JsonStore};
pub use processors::OddsResolver;
pub use standings::StandingsService;
