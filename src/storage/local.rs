// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! Writes the session snapshot as `products.json` under the configured
//! output directory. Writes are atomic (temp file, then rename) so a
//! crashed crawl never leaves a truncated snapshot behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CrawlStats, ProductRecord};
use crate::storage::{RecordStorage, Snapshot, SnapshotSummary};

const SNAPSHOT_FILE: &str = "products.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a storage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root_dir.join(SNAPSHOT_FILE)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl RecordStorage for LocalStorage {
    async fn write_snapshot(
        &self,
        records: &[ProductRecord],
        stats: &CrawlStats,
    ) -> Result<SnapshotSummary> {
        let snapshot = Snapshot::new(records.to_vec(), stats.clone());
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        let path = self.snapshot_path();
        self.write_bytes(&path, &bytes).await?;

        Ok(SnapshotSummary {
            record_count: snapshot.count,
            location: path.display().to_string(),
        })
    }

    async fn load_snapshot(&self) -> Result<Vec<ProductRecord>> {
        let bytes = tokio::fs::read(self.snapshot_path()).await?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        Ok(snapshot.records)
    }
}
