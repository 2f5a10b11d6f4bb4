use serde::Serialize;

use crate::Cutoff;

/// Result of purging a single collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionPurge {
    pub collection: String,
    pub deleted: u64,
}

/// What one sweep run removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeSummary {
    pub cutoff: Cutoff,
    pub collections: Vec<CollectionPurge>,
}

impl PurgeSummary {
    pub fn new(cutoff: Cutoff) -> Self {
        Self {
            cutoff,
            collections: vec![],
        }
    }

    pub fn record(&mut self, collection: String, deleted: u64) {
        self.collections.push(CollectionPurge {
            collection,
            deleted,
        });
    }

    pub fn total_deleted(&self) -> u64 {
        self.collections.iter().map(|c| c.deleted).sum()
    }
}
