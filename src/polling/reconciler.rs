//! One reconciliation cycle: fetch, normalize, diff, classify.

use chrono::{DateTime, Local, NaiveDate};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::change_detection::detect_and_log_changes;
use super::state::PollState;
use crate::config::Config;
use crate::data_fetcher::api::EndpointRequest;
use crate::data_fetcher::cache::ResultCache;
use crate::data_fetcher::models::{CalendarWeek, GameRecord, GameStatus};
use crate::data_fetcher::processors::{
    OddsResolver, current_week_index, events_in_week, has_live_games, normalize_event,
    normalize_events, parse_calendar, scoreboard_events, sort_for_display,
};
use crate::error::AppError;

/// Ordered record set of one cycle, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<GameRecord>,
    pub has_live_games: bool,
    pub state: PollState,
    pub generated_at: DateTime<Local>,
}

impl Snapshot {
    pub fn status_of(&self, game_id: &str) -> Option<GameStatus> {
        self.records
            .iter()
            .find(|record| record.game_id == game_id)
            .map(|record| record.status)
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing to redraw: the fetch failed, returned no events, or produced
    /// the same records as last time.
    NoUpdate,
    Updated(Snapshot),
}

/// Owns the previous cycle's records and decides when they are replaced.
///
/// All state lives on the instance, so independent reconcilers can run side
/// by side in tests.
pub struct Reconciler {
    cache: Arc<ResultCache>,
    odds: Arc<OddsResolver>,
    season_year: i32,
    scoreboard_ttl: Duration,
    events_ttl: Duration,
    idle_interval: Duration,
    live_interval: Duration,
    state: PollState,
    upstream_empty: bool,
    previous: Option<Vec<GameRecord>>,
    calendar: Vec<CalendarWeek>,
    day: Option<NaiveDate>,
}

impl Reconciler {
    pub fn new(cache: Arc<ResultCache>, odds: Arc<OddsResolver>, config: &Config) -> Self {
        Self {
            cache,
            odds,
            season_year: config.season_year,
            scoreboard_ttl: config.cache_ttl.scoreboard(),
            events_ttl: config.cache_ttl.events(),
            idle_interval: config.poll_interval(),
            live_interval: config.live_poll_interval(),
            state: PollState::Idle,
            upstream_empty: false,
            previous: None,
            calendar: Vec::new(),
            day: None,
        }
    }

    /// Polls the scoreboard of a fixed day instead of today
    pub fn with_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Set when the last tick's fetch failed or returned no events
    pub fn upstream_empty(&self) -> bool {
        self.upstream_empty
    }

    pub fn season_year(&self) -> i32 {
        self.season_year
    }

    pub fn calendar(&self) -> &[CalendarWeek] {
        &self.calendar
    }

    /// Calendar week containing now, once the calendar has loaded
    pub fn current_week(&self) -> Option<&CalendarWeek> {
        if self.calendar.is_empty() {
            return None;
        }
        let index = current_week_index(&self.calendar, chrono::Utc::now());
        self.calendar.get(index)
    }

    /// Last emitted snapshot
    pub fn current_snapshot(&self) -> Option<Snapshot> {
        self.previous
            .as_ref()
            .map(|records| self.snapshot_of(records.clone()))
    }

    /// Loads the season calendar and leaves `Idle`.
    ///
    /// A failed fetch keeps the loop idle; the scheduler tries again after
    /// the idle interval.
    #[instrument(skip(self), fields(season = self.season_year))]
    pub async fn bootstrap(&mut self) -> Result<(), AppError> {
        let request = EndpointRequest::EventsByYear {
            year: self.season_year,
        };
        let payload = self
            .cache
            .get_or_fetch(&request, self.events_ttl)
            .await
            .inspect_err(|e| warn!("Season calendar fetch failed, staying idle: {e}"))?;

        self.calendar = parse_calendar(&payload);
        if self.state == PollState::Idle {
            self.state = PollState::Polling;
            info!(
                "Season calendar loaded ({} weeks), state {} -> {}",
                self.calendar.len(),
                PollState::Idle,
                self.state
            );
        }
        Ok(())
    }

    /// Runs one reconciliation cycle.
    ///
    /// Every failure ends the cycle as [`TickOutcome::NoUpdate`] with the
    /// retained records untouched. The scoreboard fetch completes before any
    /// comparison starts.
    #[instrument(skip(self), fields(state = %self.state))]
    pub async fn tick(&mut self) -> TickOutcome {
        if self.state == PollState::Idle {
            debug!("Tick while idle, nothing to do");
            return TickOutcome::NoUpdate;
        }

        let day = self.day.unwrap_or_else(|| Local::now().date_naive());
        let request = EndpointRequest::ScoreboardByDay { day };
        let payload = match self.cache.get_or_fetch(&request, self.scoreboard_ttl).await {
            Ok(payload) => payload,
            Err(e) => {
                if e.is_retryable() {
                    warn!("Scoreboard fetch failed, keeping last snapshot: {e}");
                } else {
                    info!("Scoreboard fetch failed, keeping last snapshot: {e}");
                }
                self.mark_upstream_empty();
                return TickOutcome::NoUpdate;
            }
        };

        let raw_count = scoreboard_events(&payload).len();
        let mut records = normalize_events(&payload);
        if records.is_empty() {
            info!("Scoreboard for {day} has no usable events ({raw_count} raw)");
            self.mark_upstream_empty();
            return TickOutcome::NoUpdate;
        }
        if self.upstream_empty {
            info!("Scoreboard returned events again");
            self.upstream_empty = false;
        }

        self.attach_odds(&mut records).await;
        sort_for_display(&mut records);

        let next_state = PollState::after_cycle(has_live_games(&records));
        if next_state != self.state {
            info!("Poll state {} -> {}", self.state, next_state);
            self.state = next_state;
        }

        let previous = self.previous.as_deref().unwrap_or_default();
        if self.previous.is_some() && !detect_and_log_changes(&records, previous) {
            debug!("No changes in {} records", records.len());
            return TickOutcome::NoUpdate;
        }

        info!("Publishing snapshot with {} records", records.len());
        self.previous = Some(records.clone());
        TickOutcome::Updated(self.snapshot_of(records))
    }

    /// Delay before the next tick.
    ///
    /// Live games poll at the live interval. Everything else, including a
    /// loop whose last fetch came back empty, waits the idle interval.
    pub fn next_interval(&self) -> Duration {
        if self.upstream_empty {
            return self.idle_interval;
        }
        match self.state {
            PollState::LivePolling => self.live_interval,
            PollState::Idle | PollState::Polling => self.idle_interval,
        }
    }

    /// Sorted records of calendar week `index`, built from the cached
    /// events-by-year payload.
    #[instrument(skip(self))]
    pub async fn week_view(&self, index: usize) -> Result<Vec<GameRecord>, AppError> {
        let request = EndpointRequest::EventsByYear {
            year: self.season_year,
        };
        let payload = self.cache.get_or_fetch(&request, self.events_ttl).await?;

        let calendar = parse_calendar(&payload);
        let Some(week) = calendar.get(index) else {
            return Err(AppError::api_no_data(
                format!("Calendar has no week {index} ({} weeks)", calendar.len()),
                request.to_string(),
            ));
        };

        let mut records: Vec<GameRecord> = events_in_week(&payload, week)
            .into_iter()
            .filter_map(normalize_event)
            .collect();
        self.attach_odds(&mut records).await;
        sort_for_display(&mut records);
        debug!("Week view '{}' has {} games", week.label, records.len());
        Ok(records)
    }

    async fn attach_odds(&self, records: &mut [GameRecord]) {
        let lines = join_all(
            records
                .iter()
                .map(|record| self.odds.resolve(&record.game_id, record.status)),
        )
        .await;
        for (record, line) in records.iter_mut().zip(lines) {
            record.odds = line;
        }
    }

    fn mark_upstream_empty(&mut self) {
        if !self.upstream_empty {
            info!("Upstream returned nothing usable, backing off to the idle interval");
        }
        self.upstream_empty = true;
    }

    fn snapshot_of(&self, records: Vec<GameRecord>) -> Snapshot {
        Snapshot {
            has_live_games: has_live_games(&records),
            records,
            state: self.state,
            generated_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::UpstreamClient;
    use crate::data_fetcher::odds_ledger::OddsLedger;
    use crate::data_fetcher::persistence::JsonFileStore;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn test_config(server: &MockServer) -> Config {
        let mut config = Config {
            api_key: "test-key".to_string(),
            api_base_url: server.uri(),
            season_year: 2024,
            poll_interval_seconds: 300,
            live_poll_interval_seconds: 15,
            ..Config::default()
        };
        config.cache_ttl.scoreboard_seconds = 0;
        config.cache_ttl.odds_seconds = 0;
        config
    }

    fn reconciler_for(server: &MockServer, dir: &TempDir) -> Reconciler {
        let config = test_config(server);
        let cache = Arc::new(ResultCache::new(UpstreamClient::new(&config).unwrap()));
        let ledger =
            Arc::new(OddsLedger::open(JsonFileStore::in_dir(dir.path(), "odds.json")).unwrap());
        let odds = Arc::new(OddsResolver::new(
            Arc::clone(&cache),
            ledger,
            config.cache_ttl.odds(),
        ));
        Reconciler::new(cache, odds, &config)
    }

    fn game(id: &str, state: &str, description: &str) -> Value {
        json!({
            "id": id,
            "date": "2024-09-08T17:00Z",
            "competitions": [{
                "status": {"period": 1, "displayClock": "15:00",
                           "type": {"state": state, "description": description}},
                "competitors": [
                    {"homeAway": "home", "score": "0", "team": {"id": "1", "displayName": "Home"}},
                    {"homeAway": "away", "score": "0", "team": {"id": "2", "displayName": "Away"}}
                ]
            }]
        })
    }

    async fn mount_events(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "leagues": [{"calendar": [{"entries": [
                    {"label": "Week 1", "startDate": "2024-09-05T07:00Z", "endDate": "2024-09-11T06:59Z"}
                ]}]}],
                "events": [game("10", "post", "Final"), game("11", "pre", "Scheduled")]
            })))
            .mount(server)
            .await;
    }

    async fn mount_no_odds(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/nfl-eventodds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_idle_tick_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir);
        assert_eq!(reconciler.tick().await, TickOutcome::NoUpdate);
        assert_eq!(reconciler.state(), PollState::Idle);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_stays_idle() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir);
        assert!(reconciler.bootstrap().await.is_err());
        assert_eq!(reconciler.state(), PollState::Idle);
    }

    #[tokio::test]
    async fn test_bootstrap_moves_to_polling() {
        let mock_server = MockServer::start().await;
        mount_events(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir);
        reconciler.bootstrap().await.unwrap();

        assert_eq!(reconciler.state(), PollState::Polling);
        assert_eq!(reconciler.calendar().len(), 1);
        assert_eq!(reconciler.next_interval(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_empty_scoreboard_sets_upstream_empty() {
        let mock_server = MockServer::start().await;
        mount_events(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-day"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir);
        reconciler.bootstrap().await.unwrap();

        assert_eq!(reconciler.tick().await, TickOutcome::NoUpdate);
        assert!(reconciler.upstream_empty());
        assert_eq!(reconciler.state(), PollState::Polling);
        assert_eq!(reconciler.next_interval(), Duration::from_secs(300));
        assert!(reconciler.current_snapshot().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_snapshot() {
        let mock_server = MockServer::start().await;
        mount_events(&mock_server).await;
        mount_no_odds(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-day"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"events": [game("1", "in", "In Progress")]})),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-day"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir);
        reconciler.bootstrap().await.unwrap();

        assert!(matches!(reconciler.tick().await, TickOutcome::Updated(_)));
        assert_eq!(reconciler.state(), PollState::LivePolling);
        assert_eq!(reconciler.next_interval(), Duration::from_secs(15));

        assert_eq!(reconciler.tick().await, TickOutcome::NoUpdate);
        assert!(reconciler.upstream_empty());
        // State is kept, but the interval backs off
        assert_eq!(reconciler.state(), PollState::LivePolling);
        assert_eq!(reconciler.next_interval(), Duration::from_secs(300));
        assert_eq!(reconciler.current_snapshot().unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn test_week_view_orders_games() {
        let mock_server = MockServer::start().await;
        mount_events(&mock_server).await;
        mount_no_odds(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let reconciler = reconciler_for(&mock_server, &dir);

        let records = reconciler.week_view(0).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.game_id.as_str()).collect();
        assert_eq!(ids, vec!["11", "10"]);

        assert!(reconciler.week_view(5).await.is_err());
    }

    #[tokio::test]
    async fn test_fixed_day_is_requested() {
        let mock_server = MockServer::start().await;
        mount_events(&mock_server).await;
        mount_no_odds(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoreboard-day"))
            .and(wiremock::matchers::query_param("day", "20240908"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"events": [game("1", "post", "Final")]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut reconciler = reconciler_for(&mock_server, &dir)
            .with_day(NaiveDate::from_ymd_opt(2024, 9, 8).unwrap());
        reconciler.bootstrap().await.unwrap();

        let TickOutcome::Updated(snapshot) = reconciler.tick().await else {
            panic!("expected an update");
        };
        assert!(!snapshot.has_live_games);
        assert_eq!(snapshot.state, PollState::Polling);
        assert_eq!(snapshot.status_of("1"), Some(GameStatus::Final));
    }
}
