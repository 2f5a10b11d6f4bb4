use std::{error::Error, sync::Arc};

use chrono::{DateTime, Utc};
use config::{Config, ConfigError};
use storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, info};
use types::{Cutoff, PurgeSummary};

mod error;
pub use error::{ErrorKind, SweepError};

mod selector;
pub use selector::{is_ledger_collection, select_targets, LEDGER_MARKERS};

pub struct Sweeper {
    pub config: Config,
    storage: Arc<Mutex<dyn Storage>>,
}

impl Sweeper {
    pub fn new(config: Config, storage: Arc<Mutex<dyn Storage>>) -> Self {
        Sweeper { config, storage }
    }

    /// Cutoff for a run started at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Result<Cutoff, SweepError> {
        let days = self.config.retention_days_whole();
        Cutoff::from_retention(now, days).ok_or(SweepError::RetentionOutOfRange { days })
    }

    /// Connects, lists the collections and purges every ledger collection in
    /// turn. The first failure stops the run, collections purged before it
    /// stay purged.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<PurgeSummary, SweepError> {
        let cutoff = self.cutoff(now)?;
        info!(
            "Purging documents older than {} days (cutoff {})",
            self.config.retention_days_whole(),
            cutoff
        );

        // The session is held for the whole run
        let mut storage = self.storage.lock().await;
        storage.connect().await.map_err(SweepError::Connect)?;

        let names = storage
            .list_collection_names()
            .await
            .map_err(SweepError::List)?;
        let total = names.len();
        let targets = select_targets(names);
        debug!(
            "Selected {} of {} collections: {:?}",
            targets.len(),
            total,
            targets
        );

        let mut summary = PurgeSummary::new(cutoff);
        if targets.is_empty() {
            info!("No ledger collections found, nothing to purge");
            return Ok(summary);
        }

        for collection in targets {
            info!("Purging collection {}", collection);
            let deleted = match storage.delete_older_than(&collection, cutoff).await {
                Ok(deleted) => deleted,
                Err(source) => return Err(SweepError::Delete { collection, source }),
            };
            info!("Removed {} documents from {}", deleted, collection);
            summary.record(collection, deleted);
        }

        Ok(summary)
    }
}

/// Runs one sweep end to end: loads the configuration, opens the storage
/// with it and purges.
///
/// `open` is only called once the configuration is valid, so a configuration
/// error never reaches the database.
pub async fn run_job<L, O>(load: L, open: O, now: DateTime<Utc>) -> Result<PurgeSummary, SweepError>
where
    L: FnOnce() -> Result<Config, ConfigError>,
    O: FnOnce(&Config) -> Result<Arc<Mutex<dyn Storage>>, Box<dyn Error + Send + Sync>>,
{
    let config = load()?;
    debug!("Loaded configuration {:?}", config);

    let storage = open(&config).map_err(SweepError::Connect)?;
    Sweeper::new(config, storage).run(now).await
}
