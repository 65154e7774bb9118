//! On-demand detail for one game and roster lookups
//!
//! These calls run outside the poll loop, whenever the user asks, and share
//! the result cache and odds ledger with it.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::data_fetcher::api::EndpointRequest;
use crate::data_fetcher::cache::ResultCache;
use crate::data_fetcher::models::{GameDetail, GameStatus, RosterEntry};
use crate::data_fetcher::processors::{
    OddsResolver, find_event, normalize_event, parse_leaders, parse_line_score, parse_roster,
    parse_scoring_plays,
};
use crate::error::AppError;

pub struct GameDetailService {
    cache: Arc<ResultCache>,
    odds: Arc<OddsResolver>,
    season_year: i32,
    events_ttl: Duration,
    scoring_plays_ttl: Duration,
    roster_ttl: Duration,
}

impl GameDetailService {
    pub fn new(cache: Arc<ResultCache>, odds: Arc<OddsResolver>, config: &Config) -> Self {
        Self {
            cache,
            odds,
            season_year: config.season_year,
            events_ttl: config.cache_ttl.events(),
            scoring_plays_ttl: config.cache_ttl.scoring_plays(),
            roster_ttl: config.cache_ttl.teams(),
        }
    }

    /// Scoring plays, line score, leaders and odds for `game_id`.
    ///
    /// # Arguments
    /// * `game_id` - Upstream event id
    /// * `last_known` - Status from the latest snapshot. When `None` the
    ///   status is read from the season's events; a game found in neither
    ///   only gets the line already in the ledger
    ///
    /// # Errors
    /// * `ApiGameNotFound` - The upstream does not know the game
    /// * Any other fetch error from the scoring plays request
    #[instrument(skip(self))]
    pub async fn detail(
        &self,
        game_id: &str,
        last_known: Option<GameStatus>,
    ) -> Result<GameDetail, AppError> {
        let request = EndpointRequest::ScoringPlays {
            game_id: game_id.to_string(),
        };
        let (plays_payload, raw_event) = tokio::join!(
            self.cache.get_or_fetch(&request, self.scoring_plays_ttl),
            self.season_event(game_id),
        );

        let status = last_known.or_else(|| {
            raw_event
                .as_ref()
                .and_then(normalize_event)
                .map(|record| record.status)
        });
        let odds = match status {
            Some(status) => self.odds.resolve(game_id, status).await,
            None => {
                debug!("Game {game_id} status unknown, reading odds from the ledger only");
                self.odds.ledger().lookup(game_id)
            }
        };

        let plays_payload = plays_payload.map_err(|e| {
            if e.is_not_found() {
                AppError::api_game_not_found(game_id)
            } else {
                e
            }
        })?;

        let scoring_plays = parse_scoring_plays(&plays_payload);
        let line_score = raw_event.as_ref().and_then(parse_line_score);
        let leaders = raw_event.as_ref().map(parse_leaders).unwrap_or_default();
        debug!(
            "Game {game_id}: {} scoring plays, {} leaders, odds {:?}",
            scoring_plays.len(),
            leaders.len(),
            odds
        );

        Ok(GameDetail {
            game_id: game_id.to_string(),
            status,
            odds,
            scoring_plays,
            line_score,
            leaders,
        })
    }

    /// Raw event of `game_id` from the cached events-by-year payload.
    ///
    /// A failed fetch only costs the extra detail, so it is logged and
    /// treated as a game the season does not list.
    async fn season_event(&self, game_id: &str) -> Option<Value> {
        let request = EndpointRequest::EventsByYear {
            year: self.season_year,
        };
        match self.cache.get_or_fetch(&request, self.events_ttl).await {
            Ok(payload) => find_event(&payload, game_id).cloned(),
            Err(e) => {
                warn!("Season events unavailable for game {game_id}: {e}");
                None
            }
        }
    }

    /// Roster of `team_id`
    #[instrument(skip(self))]
    pub async fn team_roster(&self, team_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        let request = EndpointRequest::TeamRoster {
            team_id: team_id.to_string(),
        };
        let payload = self.cache.get_or_fetch(&request, self.roster_ttl).await?;
        Ok(parse_roster(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::UpstreamClient;
    use crate::data_fetcher::odds_ledger::OddsLedger;
    use crate::data_fetcher::persistence::JsonFileStore;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn service_for(server: &MockServer, dir: &TempDir) -> GameDetailService {
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
            Duration::from_secs(60),
        ));
        GameDetailService::new(cache, odds, &config)
    }

    async fn mount_scoring_plays(server: &MockServer, game_id: &str) {
        Mock::given(method("GET"))
            .and(path("/nfl-scoringplays"))
            .and(query_param("id", game_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scoringPlays": []})))
            .mount(server)
            .await;
    }

    async fn mount_season_events(server: &MockServer, events: Value) {
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .and(query_param("year", "2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": events})))
            .mount(server)
            .await;
    }

    fn season_event(id: &str, state: &str, description: &str) -> Value {
        json!({
            "id": id,
            "date": "2024-09-06T00:20Z",
            "status": {"type": {"state": state, "description": description}},
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": "27", "team": {"id": "12", "abbreviation": "KC"},
                     "linescores": [{"value": 7.0}, {"value": 6.0}, {"value": 7.0}, {"value": 7.0}]},
                    {"homeAway": "away", "score": "20", "team": {"id": "33", "abbreviation": "BAL"},
                     "linescores": [{"value": 7.0}, {"value": 6.0}, {"value": 0.0}, {"value": 7.0}]}
                ],
                "leaders": [{
                    "displayName": "Passing Leader",
                    "leaders": [{
                        "displayValue": "20/28, 291 YDS",
                        "athlete": {"shortName": "P. Mahomes"},
                        "team": {"id": "12"}
                    }]
                }]
            }]
        })
    }

    async fn mount_odds_never_called(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/nfl-eventodds"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"details": "BAL -1"}]})),
            )
            .expect(0)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_detail_for_live_game_uses_ledger_odds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nfl-scoringplays"))
            .and(query_param("id", "401"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scoringPlays": [{
                    "team": {"id": "12", "abbreviation": "KC"},
                    "period": {"number": 1},
                    "clock": {"displayValue": "4:02"},
                    "text": "Touchdown",
                    "awayScore": 0,
                    "homeScore": 7
                }]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nfl-eventodds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);
        service.odds.ledger().record("401", "KC -3.5").unwrap();

        let detail = service
            .detail("401", Some(GameStatus::InProgress))
            .await
            .unwrap();
        assert_eq!(detail.status, Some(GameStatus::InProgress));
        assert_eq!(detail.odds.as_deref(), Some("KC -3.5"));
        assert_eq!(detail.scoring_plays.len(), 1);
        assert_eq!(detail.scoring_plays[0].clock, "4:02");
    }

    #[tokio::test]
    async fn test_unlisted_game_keeps_recorded_line() {
        let mock_server = MockServer::start().await;
        mount_scoring_plays(&mock_server, "401").await;
        mount_season_events(&mock_server, json!([season_event("400", "post", "Final")])).await;
        mount_odds_never_called(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);
        service.odds.ledger().record("401", "KC -3.5").unwrap();

        let detail = service.detail("401", None).await.unwrap();
        assert_eq!(detail.status, None);
        assert_eq!(detail.odds.as_deref(), Some("KC -3.5"));
        assert!(detail.line_score.is_none());
        assert!(detail.leaders.is_empty());
        assert_eq!(
            service.odds.ledger().lookup("401").as_deref(),
            Some("KC -3.5")
        );
    }

    #[tokio::test]
    async fn test_unknown_status_taken_from_season_events() {
        let mock_server = MockServer::start().await;
        mount_scoring_plays(&mock_server, "401").await;
        mount_season_events(&mock_server, json!([season_event("401", "post", "Final")])).await;
        mount_odds_never_called(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);
        service.odds.ledger().record("401", "KC -3.5").unwrap();

        let detail = service.detail("401", None).await.unwrap();
        assert_eq!(detail.status, Some(GameStatus::Final));
        assert_eq!(detail.odds.as_deref(), Some("KC -3.5"));

        let line_score = detail.line_score.unwrap();
        assert_eq!(line_score.home.team, "KC");
        assert_eq!(line_score.home.periods, vec![7, 6, 7, 7]);
        assert_eq!(line_score.away.total, Some(20));
        assert_eq!(detail.leaders.len(), 1);
        assert_eq!(detail.leaders[0].athlete, "P. Mahomes");
    }

    #[tokio::test]
    async fn test_season_events_failure_falls_back_to_ledger() {
        let mock_server = MockServer::start().await;
        mount_scoring_plays(&mock_server, "401").await;
        Mock::given(method("GET"))
            .and(path("/nfl-events"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        mount_odds_never_called(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);

        let detail = service.detail("401", None).await.unwrap();
        assert_eq!(detail.status, None);
        assert!(detail.odds.is_none());
        assert!(service.odds.ledger().lookup("401").is_none());
    }

    #[tokio::test]
    async fn test_unknown_game_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);

        let err = service.detail("0", None).await.unwrap_err();
        assert!(matches!(err, AppError::ApiGameNotFound { ref game_id } if game_id == "0"));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_team_roster() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nfl-team-roster"))
            .and(query_param("id", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "athletes": [{"position": "offense", "items": [
                    {"displayName": "Patrick Mahomes", "jersey": "15", "position": {"abbreviation": "QB"}}
                ]}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let service = service_for(&mock_server, &dir);

        let roster = service.team_roster("12").await.unwrap();
        assert_eq!(roster.len(), 1);
        // Second call is served from the cache
        assert_eq!(service.team_roster("12").await.unwrap(), roster);
    }
}
