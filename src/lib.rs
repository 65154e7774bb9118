//! Live NFL scoreboard library
//!
//! This library polls an NFL sports-data API, caches its responses, keeps the
//! last pregame odds line per game on disk and publishes a snapshot of the
//! day's games whenever something on the scoreboard changed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nfl_scoreboard::config::Config;
//! use nfl_scoreboard::error::AppError;
//! use nfl_scoreboard::polling::TickOutcome;
//! use nfl_scoreboard::app::App;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let app = App::new(config)?;
//!
//!     // One reconciliation cycle for today's scoreboard
//!     let mut reconciler = app.reconciler(None);
//!     reconciler.bootstrap().await?;
//!     if let TickOutcome::Updated(snapshot) = reconciler.tick().await {
//!         for game in &snapshot.records {
//!             println!("{} @ {}: {}", game.away.name, game.home.name, game.status);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod display;
pub mod error;
pub mod logging;
pub mod polling;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::models::{GameRecord, GameStatus};
pub use data_fetcher::{OddsLedger, ResultCache, UpstreamClient};
pub use error::AppError;
pub use polling::{PollScheduler, PollState, Reconciler, Snapshot, TickOutcome};

// Re-export cache monitoring types for external tools
pub use data_fetcher::cache::{CacheEntry, CacheStats};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
