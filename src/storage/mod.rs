//! Storage abstractions for record persistence.
//!
//! The crawl engine hands its accumulated records to a
//! [`RecordStorage`] implementation and imposes no format beyond the
//! record shapes themselves. [`LocalStorage`] writes a single JSON
//! snapshot; other backends can implement the trait.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CrawlStats, ProductRecord};

// Re-export for convenience
pub use local::LocalStorage;

/// Summary of a snapshot write.
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    /// Number of records written
    pub record_count: usize,
    /// Where the snapshot landed
    pub location: String,
}

/// Snapshot document header plus the records themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO 8601 timestamp of the write
    pub updated_at: DateTime<Utc>,
    /// Total record count
    pub count: usize,
    /// Session counters
    pub stats: CrawlStats,
    /// The records, in acceptance order
    pub records: Vec<ProductRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<ProductRecord>, stats: CrawlStats) -> Self {
        Self {
            updated_at: Utc::now(),
            count: records.len(),
            stats,
            records,
        }
    }
}

/// Trait for record storage backends.
#[async_trait(?Send)]
pub trait RecordStorage {
    /// Persist one crawl session's records.
    async fn write_snapshot(
        &self,
        records: &[ProductRecord],
        stats: &CrawlStats,
    ) -> Result<SnapshotSummary>;

    /// Load the most recent snapshot's records.
    async fn load_snapshot(&self) -> Result<Vec<ProductRecord>>;
}
