use std::error::Error;

use config::ConfigError;

/// Coarse classification of a [`SweepError`], for log fields and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connectivity,
    Operational,
}

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("retention period of {days} days is out of range")]
    RetentionOutOfRange { days: i64 },
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] Box<dyn Error + Send + Sync>),
    #[error("failed to list collections: {0}")]
    List(#[source] Box<dyn Error + Send + Sync>),
    #[error("failed to delete old documents from {collection}: {source}")]
    Delete {
        collection: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl SweepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SweepError::Config(_) | SweepError::RetentionOutOfRange { .. } => {
                ErrorKind::Configuration
            }
            SweepError::Connect(_) => ErrorKind::Connectivity,
            SweepError::List(_) | SweepError::Delete { .. } => ErrorKind::Operational,
        }
    }
}
