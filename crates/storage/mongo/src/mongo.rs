use std::error::Error;

use async_trait::async_trait;
use config::Config;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, Credential, ServerAddress},
    Client, Database,
};
use storage::{Storage, TIMESTAMP_FIELD};
use tracing::{debug, info};
use types::Cutoff;

mod error;
pub use error::MongoStorageError;

const APP_NAME: &str = "retention-sweeper";

#[derive(Debug, Clone)]
pub struct MongoStorage {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    db: Database,
}

impl MongoStorage {
    /// Builds the client for `config`. The driver connects lazily, nothing is
    /// sent over the wire until [`Storage::connect`] is called.
    pub fn new(config: &Config) -> Result<Self, MongoStorageError> {
        let client = Client::with_options(client_options(config))?;
        let db = client.database(&config.db_name);

        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            db_name: config.db_name.clone(),
            db,
        })
    }
}

/// Single host, SCRAM credentials authenticated against the configured
/// database. Timeouts and retries are left at driver defaults.
pub fn client_options(config: &Config) -> ClientOptions {
    let credential = Credential::builder()
        .username(config.username.clone())
        .password(config.password.clone())
        .source(config.db_name.clone())
        .build();

    ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: config.host.clone(),
            port: Some(config.port),
        }])
        .credential(credential)
        .app_name(APP_NAME.to_string())
        .build()
}

/// `{ timeStamp: { $lt: cutoff } }`
pub fn older_than_filter(cutoff: Cutoff) -> Document {
    let mut filter = Document::new();
    filter.insert(TIMESTAMP_FIELD, doc! { "$lt": cutoff.as_millis() });
    filter
}

#[async_trait]
impl Storage for MongoStorage {
    async fn connect(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(MongoStorageError::from)?;
        info!(
            "Connected to database {} at {}:{}",
            self.db_name, self.host, self.port
        );
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, Box<dyn Error + Send + Sync>> {
        let names = self
            .db
            .list_collection_names()
            .await
            .map_err(MongoStorageError::from)?;
        debug!("Database {} has {} collections", self.db_name, names.len());
        Ok(names)
    }

    async fn delete_older_than(
        &mut self,
        collection: &str,
        cutoff: Cutoff,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        let result = self
            .db
            .collection::<Document>(collection)
            .delete_many(older_than_filter(cutoff))
            .await
            .map_err(MongoStorageError::from)?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "mongo.internal".to_string(),
            port: 27018,
            db_name: "tron".to_string(),
            username: "cleaner".to_string(),
            password: "s3cret".to_string(),
            retention_days: 30.0,
        }
    }

    #[test]
    fn options_target_the_configured_host() {
        let options = client_options(&config());
        assert_eq!(
            options.hosts,
            vec![ServerAddress::Tcp {
                host: "mongo.internal".to_string(),
                port: Some(27018),
            }]
        );
        assert_eq!(options.app_name.as_deref(), Some(APP_NAME));
    }

    #[test]
    fn database_is_the_authentication_source() {
        let options = client_options(&config());
        let credential = options.credential.unwrap();
        assert_eq!(credential.username.as_deref(), Some("cleaner"));
        assert_eq!(credential.password.as_deref(), Some("s3cret"));
        assert_eq!(credential.source.as_deref(), Some("tron"));
        assert!(credential.mechanism.is_none());
    }

    #[test]
    fn timestamp_filter_is_strictly_less_than() {
        let filter = older_than_filter(Cutoff::from_millis(1_700_000_000_000));
        assert_eq!(
            filter,
            doc! { "timeStamp": { "$lt": 1_700_000_000_000_i64 } }
        );
    }
}
