//! Drives the reconciler on its adaptive interval and runs the periodic odds
//! sweep on a second timer.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tracing::{debug, info, warn};

use super::reconciler::{Reconciler, Snapshot, TickOutcome};
use super::state::PollState;
use crate::data_fetcher::processors::OddsResolver;

/// Owns the reconciler while the loop runs and publishes every emitted
/// snapshot on a watch channel.
pub struct PollScheduler {
    reconciler: Reconciler,
    odds: Arc<OddsResolver>,
    sweep_interval: Duration,
    updates: watch::Sender<Option<Snapshot>>,
}

impl PollScheduler {
    /// Returns the scheduler and the receiving side of its snapshot channel.
    /// The receiver starts at `None` and only ever sees full snapshots.
    pub fn new(
        reconciler: Reconciler,
        odds: Arc<OddsResolver>,
        sweep_interval: Duration,
    ) -> (Self, watch::Receiver<Option<Snapshot>>) {
        let (updates, receiver) = watch::channel(reconciler.current_snapshot());
        (
            Self {
                reconciler,
                odds,
                sweep_interval,
                updates,
            },
            receiver,
        )
    }

    /// Runs until `shutdown` flips to `true` or its sender is dropped, then
    /// hands the reconciler back.
    ///
    /// Ticks never overlap: the next one is scheduled only after the
    /// previous one has completed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Reconciler {
        info!(
            "Poll loop starting (odds sweep every {:?})",
            self.sweep_interval
        );

        let mut sweep = interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first sweep waits one full period
        sweep.reset();

        let mut next_tick = Instant::now();

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Poll loop shutting down");
                        break;
                    }
                }

                _ = sleep_until(next_tick) => {
                    self.run_cycle().await;
                    let delay = self.reconciler.next_interval();
                    debug!(
                        "Next tick in {:?} (state {})",
                        delay,
                        self.reconciler.state()
                    );
                    next_tick = Instant::now() + delay;
                }

                _ = sweep.tick() => {
                    self.run_sweep().await;
                }
            }
        }

        self.reconciler
    }

    async fn run_cycle(&mut self) {
        if self.reconciler.state() == PollState::Idle {
            if let Err(e) = self.reconciler.bootstrap().await {
                warn!("Bootstrap failed, retrying later: {e}");
                return;
            }
        }

        match self.reconciler.tick().await {
            TickOutcome::Updated(snapshot) => {
                debug!("Publishing {} records", snapshot.records.len());
                self.updates.send_replace(Some(snapshot));
            }
            TickOutcome::NoUpdate => {}
        }
    }

    async fn run_sweep(&self) {
        let Some(week) = self.reconciler.current_week() else {
            debug!("Skipping odds sweep, calendar not loaded");
            return;
        };
        let year = self.reconciler.season_year();
        match self.odds.sweep_week(year, week).await {
            Ok(recorded) => info!(
                "Odds sweep for {} recorded {recorded} new line(s)",
                week.label
            ),
            Err(e) => warn!("Odds sweep for {} failed: {e}", week.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data_fetcher::api::UpstreamClient;
    use crate::data_fetcher::cache::ResultCache;
    use crate::data_fetcher::odds_ledger::OddsLedger;
    use crate::data_fetcher::persistence::JsonFileStore;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    async fn scheduler_for(
        server: &MockServer,
        dir: &tempfile::TempDir,
    ) -> (PollScheduler, watch::Receiver<Option<Snapshot>>) {
        let config = Config {
            api_key: "test-key".to_string(),
            api_base_url: server.uri(),
            season_year: 2024,
            ..Config::default()
        };
        let cache = Arc::new(ResultCache::new(UpstreamClient::new(&config).unwrap()));
        let ledger =
            Arc::new(OddsLedger::open(JsonFileStore::in_dir(dir.path(), "odds.json")).unwrap());
        let odds = Arc::new(OddsResolver::new(
            Arc::clone(&cache),
            ledger,
            config.cache_ttl.odds(),
        ));
        let reconciler = Reconciler::new(cache, Arc::clone(&odds), &config);
        PollScheduler::new(reconciler, odds, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_first_update_is_published() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-day"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": [{
                "id": "7",
                "competitions": [{
                    "status": {"type": {"state": "post", "description": "Final"}},
                    "competitors": [
                        {"homeAway": "home", "score": "24", "team": {"id": "1"}},
                        {"homeAway": "away", "score": "17", "team": {"id": "2"}}
                    ]
                }]
            }]})))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (scheduler, mut updates) = scheduler_for(&mock_server, &dir).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        tokio::time::timeout(Duration::from_secs(5), updates.changed())
            .await
            .expect("no update within timeout")
            .unwrap();
        let snapshot = updates.borrow().clone().unwrap();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].home.score, Some(24));

        shutdown_tx.send(true).unwrap();
        let reconciler = handle.await.unwrap();
        assert_eq!(reconciler.state(), PollState::Polling);
    }

    #[tokio::test]
    async fn test_sweep_uses_current_week_season_type() {
        let mock_server = MockServer::start().await;
        let now = chrono::Utc::now();
        let format = "%Y-%m-%dT%H:%MZ";
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "leagues": [{"calendar": [{
                    "label": "Preseason",
                    "value": "1",
                    "entries": [{
                        "label": "Preseason Week 1",
                        "value": "1",
                        "startDate": (now - chrono::Duration::days(1)).format(format).to_string(),
                        "endDate": (now + chrono::Duration::days(6)).format(format).to_string()
                    }]
                }]}],
                "events": []
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-week"))
            .and(query_param("seasontype", "1"))
            .and(query_param("week", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{"id": "pre1", "competitions": [{"odds": [{"details": "KC -1"}]}]}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (mut scheduler, _updates) = scheduler_for(&mock_server, &dir).await;
        scheduler.reconciler.bootstrap().await.unwrap();
        assert_eq!(scheduler.reconciler.current_week().unwrap().season_type, 1);

        scheduler.run_sweep().await;
        assert_eq!(scheduler.odds.ledger().lookup("pre1").as_deref(), Some("KC -1"));
    }

    #[tokio::test]
    async fn test_shutdown_while_idle() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (scheduler, updates) = scheduler_for(&mock_server, &dir).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        drop(shutdown_tx);
        let reconciler = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop did not stop")
            .unwrap();
        assert_eq!(reconciler.state(), PollState::Idle);
        assert!(updates.borrow().is_none());
    }
}
