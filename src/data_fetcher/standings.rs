//! Standings snapshot: operator-triggered refresh and disk reload
//!
//! The record and division endpoints are slow and change at most weekly, so
//! nothing here runs on a timer. `refresh` is only called from the
//! `--refresh-standings` command; everything else reads the saved rows.

use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::constants::files::{TEAM_DIVISIONS, TEAM_RECORDS};
use crate::constants::polling::STANDINGS_CONCURRENCY;
use crate::data_fetcher::api::EndpointRequest;
use crate::data_fetcher::cache::ResultCache;
use crate::data_fetcher::models::{StandingsSnapshot, TeamDivisionRow, TeamRecordRow};
use crate::data_fetcher::persistence::{JsonFileStore, JsonStore};
use crate::data_fetcher::processors::standings::{
    ListedTeam, parse_division_row, parse_record_row, parse_team_list,
};
use crate::error::AppError;

type RecordStore = Box<dyn JsonStore<Vec<TeamRecordRow>> + Send + Sync>;
type DivisionStore = Box<dyn JsonStore<Vec<TeamDivisionRow>> + Send + Sync>;

pub struct StandingsService {
    cache: Arc<ResultCache>,
    records: RecordStore,
    divisions: DivisionStore,
    season_year: i32,
    teams_ttl: Duration,
}

impl StandingsService {
    /// Service persisting to `team_records.json` and `team_divisions.json`
    /// inside `data_dir`.
    pub fn new(
        cache: Arc<ResultCache>,
        data_dir: &Path,
        season_year: i32,
        teams_ttl: Duration,
    ) -> Self {
        Self::with_stores(
            cache,
            JsonFileStore::in_dir(data_dir, TEAM_RECORDS),
            JsonFileStore::in_dir(data_dir, TEAM_DIVISIONS),
            season_year,
            teams_ttl,
        )
    }

    pub fn with_stores(
        cache: Arc<ResultCache>,
        records: impl JsonStore<Vec<TeamRecordRow>> + Send + Sync + 'static,
        divisions: impl JsonStore<Vec<TeamDivisionRow>> + Send + Sync + 'static,
        season_year: i32,
        teams_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            records: Box::new(records),
            divisions: Box::new(divisions),
            season_year,
            teams_ttl,
        }
    }

    /// Refetches every team's record and division, saves both row sets and
    /// returns the joined snapshot.
    ///
    /// Per-team failures only cost that team's row. The team list itself
    /// must load; when it fails or is empty the saved rows are left alone.
    #[instrument(skip(self), fields(season = self.season_year))]
    pub async fn refresh(&self) -> Result<StandingsSnapshot, AppError> {
        let payload = self
            .cache
            .get_or_fetch(&EndpointRequest::Teams, self.teams_ttl)
            .await?;
        let teams = parse_team_list(&payload);
        if teams.is_empty() {
            return Err(AppError::api_no_data(
                "Team list contained no teams",
                EndpointRequest::Teams.to_string(),
            ));
        }
        info!("Refreshing standings for {} teams", teams.len());

        let rows: Vec<(Option<TeamRecordRow>, Option<TeamDivisionRow>)> = stream::iter(&teams)
            .map(|team| self.fetch_team_rows(team))
            .buffer_unordered(STANDINGS_CONCURRENCY)
            .collect()
            .await;

        let (records, divisions): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let mut records: Vec<TeamRecordRow> = records.into_iter().flatten().collect();
        let mut divisions: Vec<TeamDivisionRow> = divisions.into_iter().flatten().collect();
        records.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        divisions.sort_by(|a, b| a.team_id.cmp(&b.team_id));

        info!(
            "Standings refresh built {} record rows and {} division rows",
            records.len(),
            divisions.len()
        );

        self.records.save(&records)?;
        self.divisions.save(&divisions)?;
        Ok(StandingsSnapshot::join(&records, &divisions))
    }

    /// Joins the saved rows. Missing files give an empty snapshot.
    pub fn load(&self) -> Result<StandingsSnapshot, AppError> {
        let records = self.records.load()?;
        let divisions = self.divisions.load()?;
        Ok(StandingsSnapshot::join(&records, &divisions))
    }

    async fn fetch_team_rows(
        &self,
        team: &ListedTeam,
    ) -> (Option<TeamRecordRow>, Option<TeamDivisionRow>) {
        // Operator refresh: always go upstream for these two
        let record_request = EndpointRequest::TeamRecord {
            team_id: team.team_id.clone(),
            year: self.season_year,
        };
        let division_request = EndpointRequest::TeamDivision {
            team_id: team.team_id.clone(),
            year: self.season_year,
        };
        let (record_payload, division_payload) = tokio::join!(
            self.cache.get_or_fetch(&record_request, Duration::ZERO),
            self.cache.get_or_fetch(&division_request, Duration::ZERO),
        );

        let record = match record_payload {
            Ok(payload) => parse_record_row(team, &payload).or_else(|| {
                warn!("Unusable record payload for team {}", team.name);
                None
            }),
            Err(e) => {
                warn!("Failed to fetch record for team {}: {}", team.name, e);
                None
            }
        };
        let division = match division_payload {
            Ok(payload) => parse_division_row(team, &payload).or_else(|| {
                warn!("Unusable division payload for team {}", team.name);
                None
            }),
            Err(e) => {
                warn!("Failed to fetch division for team {}: {}", team.name, e);
                None
            }
        };
        (record, division)
    }
}
