//! Change logging for successive record sets.
//!
//! The update decision itself is plain structural equality on the record
//! sets; this module only reports what moved.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::data_fetcher::models::{GameRecord, GameStatus};

/// Hash of a whole record set, logged so consecutive cycles can be
/// compared at a glance.
pub(super) fn calculate_records_hash(records: &[GameRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.hash(&mut hasher);
    hasher.finish()
}

/// Logs per-game score, status and clock changes between two record sets.
///
/// Returns whether the sets differ.
pub(super) fn detect_and_log_changes(records: &[GameRecord], previous: &[GameRecord]) -> bool {
    let changed = records != previous;
    tracing::debug!(
        "Record set hash {:016x} (previous {:016x}), changed={}",
        calculate_records_hash(records),
        calculate_records_hash(previous),
        changed
    );

    if !changed {
        let live: Vec<String> = records
            .iter()
            .filter(|record| record.is_live())
            .map(|record| {
                format!(
                    "{} @ {} ({})",
                    record.away.short_name(),
                    record.home.short_name(),
                    record.clock.as_deref().unwrap_or("-")
                )
            })
            .collect();
        if !live.is_empty() {
            tracing::debug!(
                "No changes despite {} live game(s): {}",
                live.len(),
                live.join(", ")
            );
        }
        return false;
    }

    let previous_by_id: HashMap<&str, &GameRecord> = previous
        .iter()
        .map(|record| (record.game_id.as_str(), record))
        .collect();

    for record in records {
        let Some(old) = previous_by_id.get(record.game_id.as_str()) else {
            tracing::debug!("New game in snapshot: {}", record.game_id);
            continue;
        };

        if (record.home.score, record.away.score) != (old.home.score, old.away.score) {
            tracing::info!(
                "Score update: {} {} - {} {} (was {} - {})",
                record.away.short_name(),
                score_text(record.away.score),
                score_text(record.home.score),
                record.home.short_name(),
                score_text(old.away.score),
                score_text(old.home.score)
            );
        }
        if record.status != old.status {
            tracing::info!(
                "Status change for game {}: {} -> {}",
                record.game_id,
                old.status,
                record.status
            );
            if record.status == GameStatus::Final {
                tracing::info!(
                    "Game {} finished: {} {} - {} {}",
                    record.game_id,
                    record.away.short_name(),
                    score_text(record.away.score),
                    score_text(record.home.score),
                    record.home.short_name()
                );
            }
        }
        if record.is_live() && (record.period, &record.clock) != (old.period, &old.clock) {
            tracing::debug!(
                "Game clock update for game {}: {:?} {:?} -> {:?} {:?}",
                record.game_id,
                old.period,
                old.clock,
                record.period,
                record.clock
            );
        }
    }

    changed
}

fn score_text(score: Option<u16>) -> String {
    score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}
