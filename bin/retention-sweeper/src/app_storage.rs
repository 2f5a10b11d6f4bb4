use config::Config;
use mongo_storage::MongoStorage;
use std::{error::Error, sync::Arc};
use storage::Storage;
use tokio::sync::Mutex;

/// Opens the MongoDB storage described by `config`.
pub(crate) fn open_storage(
    config: &Config,
) -> Result<Arc<Mutex<dyn Storage>>, Box<dyn Error + Send + Sync>> {
    let db: Arc<Mutex<dyn Storage>> = Arc::new(Mutex::new(MongoStorage::new(config)?));
    Ok(db)
}
