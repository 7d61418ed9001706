//! Transcript cache for tubecache.
//!
//! An in-memory index of processed videos, mirrored write-through to a
//! [`CacheStorage`] backend. The in-memory index is authoritative for the
//! running process; the storage backend is what survives restarts.

mod disk;
mod memory;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

use crate::error::{Result, TubecacheError};
use crate::source::VideoInfo;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A cached transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    /// Canonical video ID (primary key).
    pub video_id: String,
    /// Video metadata, if known.
    pub info: Option<VideoInfo>,
    /// Formatted transcript text.
    pub text: Option<String>,
}

impl TranscriptRecord {
    /// A servable record with metadata and text.
    pub fn complete(info: VideoInfo, text: String) -> Self {
        Self {
            video_id: info.video_id.clone(),
            info: Some(info),
            text: Some(text),
        }
    }

    /// Whether the record can be served without re-fetching.
    pub fn is_complete(&self) -> bool {
        self.text.is_some()
    }
}

/// Durable backend for cached records.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Persist one record, replacing any earlier copy.
    async fn save(&self, record: &TranscriptRecord) -> Result<()>;

    /// Load every persisted record, in discovery order.
    async fn load_all(&self) -> Result<Vec<TranscriptRecord>>;
}

#[derive(Default)]
struct CacheIndex {
    records: HashMap<String, TranscriptRecord>,
    order: Vec<String>,
}

impl CacheIndex {
    fn put(&mut self, record: TranscriptRecord) {
        if !self.records.contains_key(&record.video_id) {
            self.order.push(record.video_id.clone());
        }
        self.records.insert(record.video_id.clone(), record);
    }
}

/// In-memory transcript cache with write-through persistence.
pub struct TranscriptCache {
    index: RwLock<CacheIndex>,
    storage: Box<dyn CacheStorage>,
}

impl TranscriptCache {
    /// Create an empty cache over a storage backend.
    pub fn new(storage: impl CacheStorage + 'static) -> Self {
        Self {
            index: RwLock::new(CacheIndex::default()),
            storage: Box::new(storage),
        }
    }

    /// Look up a record by video ID.
    pub async fn lookup(&self, video_id: &str) -> Option<TranscriptRecord> {
        self.index.read().await.records.get(video_id).cloned()
    }

    /// Insert or replace a record, then persist it.
    ///
    /// A persistence failure is returned but the in-memory insert stands.
    pub async fn insert(&self, record: TranscriptRecord) -> Result<()> {
        self.index.write().await.put(record.clone());

        if !record.is_complete() {
            debug!("Record {} has no text, not persisting", record.video_id);
            return Ok(());
        }

        self.storage
            .save(&record)
            .await
            .map_err(|e| TubecacheError::PersistenceFailure {
                video_id: record.video_id.clone(),
                reason: e.to_string(),
            })
    }

    /// All records in insertion order.
    pub async fn list_all(&self) -> Vec<TranscriptRecord> {
        let index = self.index.read().await;
        index
            .order
            .iter()
            .filter_map(|id| index.records.get(id).cloned())
            .collect()
    }

    /// Number of cached records.
    pub async fn len(&self) -> usize {
        self.index.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Reload persisted records into memory.
    ///
    /// Returns the number of records loaded. A backend that cannot be read
    /// at all leaves the cache as it was.
    pub async fn rehydrate(&self) -> usize {
        let records = match self.storage.load_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Could not load cached transcripts: {}", e);
                return 0;
            }
        };

        let count = records.len();
        let mut index = self.index.write().await;
        for record in records {
            index.put(record);
        }
        info!("Loaded {} cached transcripts", count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    #[async_trait]
    impl CacheStorage for FailingStorage {
        async fn save(&self, _record: &TranscriptRecord) -> Result<()> {
            Err(TubecacheError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        async fn load_all(&self) -> Result<Vec<TranscriptRecord>> {
            Err(TubecacheError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing",
            )))
        }
    }

    fn record(id: &str, title: &str) -> TranscriptRecord {
        TranscriptRecord::complete(VideoInfo::new(id, title, "Channel"), format!("text of {}", id))
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let cache = TranscriptCache::new(MemoryStorage::new());
        assert!(cache.lookup("aaaaaaaaaaa").await.is_none());

        cache.insert(record("aaaaaaaaaaa", "A")).await.unwrap();
        let found = cache.lookup("aaaaaaaaaaa").await.unwrap();
        assert_eq!(found.text.as_deref(), Some("text of aaaaaaaaaaa"));
        assert!(found.is_complete());
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order_on_overwrite() {
        let cache = TranscriptCache::new(MemoryStorage::new());
        assert!(cache.list_all().await.is_empty());

        cache.insert(record("bbbbbbbbbbb", "B")).await.unwrap();
        cache.insert(record("aaaaaaaaaaa", "A")).await.unwrap();
        cache.insert(record("bbbbbbbbbbb", "B2")).await.unwrap();

        let all = cache.list_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].video_id, "bbbbbbbbbbb");
        assert_eq!(all[0].info.as_ref().unwrap().title, "B2");
        assert_eq!(all[1].video_id, "aaaaaaaaaaa");
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_memory_copy() {
        let cache = TranscriptCache::new(FailingStorage);
        let err = cache.insert(record("aaaaaaaaaaa", "A")).await.unwrap_err();
        assert!(matches!(err, TubecacheError::PersistenceFailure { .. }));
        assert!(cache.lookup("aaaaaaaaaaa").await.is_some());
    }

    #[tokio::test]
    async fn test_incomplete_record_not_persisted() {
        let storage = MemoryStorage::new();
        let cache = TranscriptCache::new(storage.clone());
        let partial = TranscriptRecord {
            video_id: "aaaaaaaaaaa".to_string(),
            info: Some(VideoInfo::placeholder("aaaaaaaaaaa")),
            text: None,
        };

        cache.insert(partial).await.unwrap();
        assert!(!cache.lookup("aaaaaaaaaaa").await.unwrap().is_complete());
        assert!(storage.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rehydrate_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.save(&record("aaaaaaaaaaa", "A")).await.unwrap();
        storage.save(&record("bbbbbbbbbbb", "B")).await.unwrap();

        let cache = TranscriptCache::new(storage);
        assert_eq!(cache.rehydrate().await, 2);
        assert_eq!(cache.rehydrate().await, 2);
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.list_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_rehydrate_unreadable_backend() {
        let cache = TranscriptCache::new(FailingStorage);
        assert_eq!(cache.rehydrate().await, 0);
        assert!(cache.is_empty().await);
    }
}
