use async_trait::async_trait;
use std::{collections::BTreeMap, error::Error};
use storage::Storage;
use thiserror::Error as ThisError;
use types::Cutoff;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum MockStorageError {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("listing collections failed")]
    ListFailed,
    #[error("delete on {0} failed")]
    DeleteFailed(String),
}

/// In-memory database. Each collection holds the `timeStamp` values of its
/// documents.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    pub collections: BTreeMap<String, Vec<i64>>,

    /// Collections passed to `delete_older_than`, in call order
    pub delete_calls: Vec<String>,
    pub connect_calls: usize,

    pub fail_connect: bool,
    pub fail_list: bool,
    pub fail_delete_on: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, timestamps: Vec<i64>) -> Self {
        self.collections.insert(name.to_string(), timestamps);
        self
    }

    pub fn timestamps(&self, collection: &str) -> &[i64] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn connect(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.connect_calls += 1;
        if self.fail_connect {
            return Err(MockStorageError::ConnectionRefused.into());
        }
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, Box<dyn Error + Send + Sync>> {
        if self.fail_list {
            return Err(MockStorageError::ListFailed.into());
        }
        Ok(self.collections.keys().cloned().collect())
    }

    async fn delete_older_than(
        &mut self,
        collection: &str,
        cutoff: Cutoff,
    ) -> Result<u64, Box<dyn Error + Send + Sync>> {
        self.delete_calls.push(collection.to_string());
        if self.fail_delete_on.as_deref() == Some(collection) {
            return Err(MockStorageError::DeleteFailed(collection.to_string()).into());
        }

        // Deleting from a collection that does not exist is a no-op, as in MongoDB
        let Some(docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|ts| *ts >= cutoff.as_millis());
        Ok((before - docs.len()) as u64)
    }
}
