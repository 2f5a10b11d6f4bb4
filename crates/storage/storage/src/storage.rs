use std::error::Error;
use types::Cutoff;

use async_trait::async_trait;

/// Name of the document field holding the epoch-millisecond timestamp
pub const TIMESTAMP_FIELD: &str = "timeStamp";

#[async_trait]
pub trait Storage: Send {
    /// Checks that the database is reachable and the credentials are accepted.
    async fn connect(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn list_collection_names(&self) -> Result<Vec<String>, Box<dyn Error + Send + Sync>>;

    /// Deletes every document of `collection` whose timestamp is strictly
    /// below `cutoff` and returns how many were removed.
    async fn delete_older_than(
        &mut self,
        collection: &str,
        cutoff: Cutoff,
    ) -> Result<u64, Box<dyn Error + Send + Sync>>;
}
