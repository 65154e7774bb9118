//! Durable map from game id to the last known pregame odds line
//!
//! Odds stop being published once a game kicks off, so the line seen before
//! kickoff is kept here and shown for the rest of the game.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

use super::persistence::JsonStore;
use crate::error::AppError;

/// Game id → odds line, the on-disk shape of the ledger.
pub type OddsMap = HashMap<String, String>;

/// Store the ledger persists through
pub type LedgerStore = Box<dyn JsonStore<OddsMap> + Send + Sync>;

/// In-memory odds map mirrored to a [`JsonStore`] on every change.
///
/// The lock is a plain `std::sync::RwLock`; it is never held across an
/// `.await`.
pub struct OddsLedger {
    entries: RwLock<OddsMap>,
    store: LedgerStore,
}

impl OddsLedger {
    /// Loads the ledger from `store`. A store that was never written opens as
    /// an empty ledger.
    pub fn open(store: impl JsonStore<OddsMap> + Send + Sync + 'static) -> Result<Self, AppError> {
        let entries = store.load()?;
        info!("Opened odds ledger with {} entries", entries.len());
        Ok(Self {
            entries: RwLock::new(entries),
            store: Box::new(store),
        })
    }

    /// Upserts the line for `game_id` and writes the whole map back.
    ///
    /// # Returns
    /// * `Ok(true)` - The stored line changed and was persisted
    /// * `Ok(false)` - The same line was already stored; nothing was written
    /// * `Err(AppError)` - The map was updated in memory but saving failed
    pub fn record(&self, game_id: &str, line: &str) -> Result<bool, AppError> {
        let snapshot = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            if entries.get(game_id).map(String::as_str) == Some(line) {
                debug!("Odds unchanged for game {game_id}: {line}");
                return Ok(false);
            }
            entries.insert(game_id.to_string(), line.to_string());
            entries.clone()
        };

        if let Err(e) = self.store.save(&snapshot) {
            warn!("Failed to persist odds ledger after recording game {game_id}: {e}");
            return Err(e);
        }
        debug!("Recorded odds for game {game_id}: {line}");
        Ok(true)
    }

    /// Last recorded line for `game_id`.
    pub fn lookup(&self, game_id: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(game_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
