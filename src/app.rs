use crate::cli::Args;
use crate::config::Config;
use crate::constants::files;
use crate::data_fetcher::{
    GameDetailService, JsonFileStore, OddsLedger, OddsResolver, ResultCache, StandingsService,
    UpstreamClient,
};
use crate::display;
use crate::error::AppError;
use crate::polling::{PollScheduler, Reconciler};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Shared services wired from one [`Config`].
///
/// The cache and the odds ledger are created once and shared by the poll
/// loop and every on-demand view.
pub struct App {
    pub config: Config,
    pub cache: Arc<ResultCache>,
    pub odds: Arc<OddsResolver>,
    pub details: GameDetailService,
    pub standings: StandingsService,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let data_dir = config.data_dir_path();
        let cache = Arc::new(ResultCache::new(UpstreamClient::new(&config)?));
        let ledger = Arc::new(OddsLedger::open(JsonFileStore::in_dir(
            &data_dir,
            files::ODDS_LEDGER,
        ))?);
        info!(
            "Odds ledger loaded from {} ({} entries)",
            data_dir.display(),
            ledger.len()
        );

        let odds = Arc::new(OddsResolver::new(
            Arc::clone(&cache),
            ledger,
            config.cache_ttl.odds(),
        ));
        let details = GameDetailService::new(Arc::clone(&cache), Arc::clone(&odds), &config);
        let standings = StandingsService::new(
            Arc::clone(&cache),
            &data_dir,
            config.season_year,
            config.cache_ttl.teams(),
        );

        Ok(Self {
            config,
            cache,
            odds,
            details,
            standings,
        })
    }

    /// A reconciler over this app's cache and odds resolver, pinned to `day`
    /// when given.
    pub fn reconciler(&self, day: Option<NaiveDate>) -> Reconciler {
        let reconciler = Reconciler::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.odds),
            &self.config,
        );
        match day {
            Some(day) => reconciler.with_day(day),
            None => reconciler,
        }
    }
}

/// Run the watch flow.
///
/// - Spawns the poll scheduler
/// - Prints every published snapshot
/// - Stops the scheduler on Ctrl+C and waits for it to finish
pub async fn run_watch(app: &App, args: &Args, day: Option<NaiveDate>) -> Result<(), AppError> {
    let (scheduler, mut updates) = PollScheduler::new(
        app.reconciler(day),
        Arc::clone(&app.odds),
        app.config.odds_sweep_interval(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(shutdown_rx));

    println!("Waiting for the first scoreboard... (Ctrl+C to quit)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Poll loop stopped unexpectedly");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    println!("\n{}", display::render_snapshot(&snapshot));
                    if args.debug {
                        println!("{}", app.cache.debug_info().await);
                    }
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    match handle.await {
        Ok(reconciler) => info!("Poll loop stopped in state {}", reconciler.state()),
        Err(e) => warn!("Poll loop task failed: {e}"),
    }
    Ok(())
}
