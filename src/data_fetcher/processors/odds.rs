//! Odds policy: live lines before kickoff, remembered lines afterwards

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::constants::ODDS_PROVIDER_ID;
use crate::data_fetcher::api::EndpointRequest;
use crate::data_fetcher::cache::ResultCache;
use crate::data_fetcher::models::scoreboard::Event;
use crate::data_fetcher::models::{CalendarWeek, GameStatus, OddsResponse};
use crate::data_fetcher::odds_ledger::OddsLedger;
use crate::data_fetcher::processors::normalize::scoreboard_events;
use crate::error::AppError;

/// Decides where a game's odds line comes from.
///
/// Scheduled games ask the odds endpoint (through the cache) and remember
/// what they get. Games that have kicked off only read the ledger, since the
/// upstream stops publishing lines once play starts.
pub struct OddsResolver {
    cache: Arc<ResultCache>,
    ledger: Arc<OddsLedger>,
    odds_ttl: Duration,
    provider_id: String,
}

impl OddsResolver {
    pub fn new(cache: Arc<ResultCache>, ledger: Arc<OddsLedger>, odds_ttl: Duration) -> Self {
        Self {
            cache,
            ledger,
            odds_ttl,
            provider_id: ODDS_PROVIDER_ID.to_string(),
        }
    }

    /// Uses the line of a different sportsbook
    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    pub fn ledger(&self) -> &OddsLedger {
        &self.ledger
    }

    /// Odds line to show for `game_id` in `status`.
    ///
    /// # Arguments
    /// * `game_id` - Upstream event id
    /// * `status` - Current status of the game
    ///
    /// # Returns
    /// * `Some(line)` - A live line for a scheduled game, otherwise the
    ///   last recorded line
    /// * `None` - Nothing live and nothing recorded
    #[instrument(skip(self), fields(game_id = %game_id, status = ?status))]
    pub async fn resolve(&self, game_id: &str, status: GameStatus) -> Option<String> {
        if status != GameStatus::Scheduled {
            let line = self.ledger.lookup(game_id);
            debug!("Game {game_id} is {status}, using recorded odds: {line:?}");
            return line;
        }

        let request = EndpointRequest::Odds {
            game_id: game_id.to_string(),
        };
        match self.cache.get_or_fetch(&request, self.odds_ttl).await {
            Ok(payload) => {
                if let Some(line) = select_provider_line(&payload, &self.provider_id) {
                    if let Err(e) = self.ledger.record(game_id, &line) {
                        warn!("Could not persist odds for game {game_id}: {e}");
                    }
                    return Some(line);
                }
                debug!(
                    "No line from provider {} for game {game_id}, using recorded odds",
                    self.provider_id
                );
            }
            Err(e) => {
                debug!("Odds fetch failed for game {game_id}, using recorded odds: {e}");
            }
        }
        self.ledger.lookup(game_id)
    }

    /// Records the odds summary of every event on a week's scoreboard.
    ///
    /// The week is requested with its season type, so preseason week 1 and
    /// regular season week 1 are different scoreboards. Each event's
    /// `competitions[0].odds[0].details` is written to the ledger regardless
    /// of game status. Events without odds are skipped.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of ledger entries that changed
    /// * `Err(AppError)` - The week scoreboard could not be fetched
    #[instrument(skip(self, week), fields(week = %week.label, season_type = week.season_type))]
    pub async fn sweep_week(&self, year: i32, week: &CalendarWeek) -> Result<usize, AppError> {
        let request = EndpointRequest::ScoreboardByWeek {
            year,
            season_type: week.season_type,
            week: week.week_number,
        };
        let payload = self.cache.get_or_fetch(&request, self.odds_ttl).await?;

        let mut changed = 0;
        for raw in scoreboard_events(&payload) {
            let Ok(event) = serde_json::from_value::<Event>(raw.clone()) else {
                continue;
            };
            let Some(game_id) = event.id else {
                continue;
            };
            let Some(line) = event
                .competitions
                .first()
                .and_then(|competition| competition.odds.first())
                .and_then(|odds| odds.details.clone())
            else {
                continue;
            };

            match self.ledger.record(&game_id, &line) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => warn!("Could not persist swept odds for game {game_id}: {e}"),
            }
        }

        info!(
            "Odds sweep for {year} {} updated {changed} ledger entries",
            week.label
        );
        Ok(changed)
    }
}

/// The `details` line of the item whose `provider.id` is `provider_id`.
pub fn select_provider_line(payload: &Value, provider_id: &str) -> Option<String> {
    let response: OddsResponse = serde_json::from_value(payload.clone()).ok()?;
    response
        .items
        .into_iter()
        .find(|item| {
            item.provider
                .as_ref()
                .and_then(|provider| provider.id.as_deref())
                == Some(provider_id)
        })
        .and_then(|item| item.details)
}
