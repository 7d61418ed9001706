//! In-memory storage backend.
//!
//! Useful for testing and for running without a writable cache directory.

use super::{CacheStorage, TranscriptRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage that keeps saved records in memory. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<RwLock<Vec<TranscriptRecord>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn save(&self, record: &TranscriptRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.video_id == record.video_id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TranscriptRecord>> {
        Ok(self.records.read().await.clone())
    }
}
