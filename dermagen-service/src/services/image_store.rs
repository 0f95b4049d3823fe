//! In-memory, append-only store of generated image records.
//!
//! Records live for the lifetime of the process. There is no update, delete
//! or eviction; every write appends a whole batch under one lock so readers
//! never observe half of a batch.

use crate::models::{ImageFilter, ImageRecord, NewImageRecord};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    records: Arc<RwLock<Vec<ImageRecord>>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every record with the current time and append the batch.
    pub async fn append(&self, batch: Vec<NewImageRecord>) -> usize {
        let created_at = Utc::now();
        let appended = batch.len();

        let mut records = self.records.write().await;
        records.extend(batch.into_iter().map(|record| ImageRecord {
            class: record.class,
            path: record.path,
            created_at,
        }));

        tracing::debug!(appended, total = records.len(), "Appended image records");
        appended
    }

    /// Most recent records first, restricted by `filter` and capped at `limit`.
    pub async fn query(&self, filter: &ImageFilter, limit: usize) -> Vec<ImageRecord> {
        let class = filter.effective_class();

        let mut matching: Vec<ImageRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| class.is_none_or(|c| record.class == c))
            .cloned()
            .collect();

        // Stable, so records of one batch keep their upstream order.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        matching
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
