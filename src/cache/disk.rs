//! On-disk storage backend.
//!
//! Layout under the cache root, one pair per video:
//! - `<video_id>.txt` holds the formatted transcript
//! - `<video_id>_meta.json` holds `{"title": .., "channel": ..}` when metadata is known

use super::{CacheStorage, TranscriptRecord};
use crate::error::{Result, TubecacheError};
use crate::source::{VideoInfo, UNKNOWN_CHANNEL, UNKNOWN_TITLE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, instrument, warn};

const TEXT_EXTENSION: &str = ".txt";
const META_SUFFIX: &str = "_meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct MetaFile {
    title: Option<String>,
    channel: Option<String>,
}

/// Storage that mirrors records into a directory.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Open a cache directory, creating it if absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text_path(&self, video_id: &str) -> PathBuf {
        self.root.join(format!("{}{}", video_id, TEXT_EXTENSION))
    }

    pub fn meta_path(&self, video_id: &str) -> PathBuf {
        self.root.join(format!("{}{}", video_id, META_SUFFIX))
    }

    /// Read the metadata artifact for a video, if present and well-formed.
    async fn read_meta(&self, video_id: &str) -> Option<VideoInfo> {
        let path = self.meta_path(video_id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }

        match parse_meta(video_id, &path).await {
            Ok(info) => Some(info),
            Err(e) => {
                debug!("Ignoring metadata: {}", e);
                None
            }
        }
    }

    /// Transcript files in the root, oldest first.
    async fn text_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut found: Vec<(SystemTime, String, PathBuf)> = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(video_id) = name.strip_suffix(TEXT_EXTENSION) else {
                continue;
            };
            if video_id.is_empty() || video_id.ends_with("_meta") {
                continue;
            }

            let modified = entry
                .metadata()
                .await
                .ok()
                .filter(|m| m.is_file())
                .and_then(|m| m.modified().ok());
            if let Some(modified) = modified {
                found.push((modified, video_id.to_string(), path));
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        Ok(found.into_iter().map(|(_, id, path)| (id, path)).collect())
    }
}

async fn parse_meta(video_id: &str, path: &Path) -> Result<VideoInfo> {
    let corrupt = |reason: String| TubecacheError::CorruptCacheEntry {
        path: path.display().to_string(),
        reason,
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| corrupt(e.to_string()))?;
    let meta: MetaFile = serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

    Ok(VideoInfo::new(
        video_id,
        meta.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        meta.channel.unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
    ))
}

#[async_trait]
impl CacheStorage for DiskStorage {
    #[instrument(skip(self, record), fields(video_id = %record.video_id))]
    async fn save(&self, record: &TranscriptRecord) -> Result<()> {
        let Some(text) = &record.text else {
            return Ok(());
        };

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.text_path(&record.video_id), text).await?;

        if let Some(info) = &record.info {
            let meta = MetaFile {
                title: Some(info.title.clone()),
                channel: Some(info.channel.clone()),
            };
            tokio::fs::write(self.meta_path(&record.video_id), serde_json::to_string(&meta)?)
                .await?;
        }

        debug!("Saved transcript to {}", self.root.display());
        Ok(())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn load_all(&self) -> Result<Vec<TranscriptRecord>> {
        let mut records = Vec::new();

        for (video_id, path) in self.text_files().await? {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable transcript {}: {}", path.display(), e);
                    continue;
                }
            };

            let info = self.read_meta(&video_id).await;
            records.push(TranscriptRecord {
                video_id,
                info,
                text: Some(text),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TranscriptCache;

    fn record(id: &str) -> TranscriptRecord {
        TranscriptRecord::complete(
            VideoInfo::new(id, "A Title", "A Channel"),
            format!("Title: A Title\nChannel: A Channel\nVideo ID: {}\n\nTRANSCRIPT:\n[00:00] Hi\n", id),
        )
    }

    #[tokio::test]
    async fn test_save_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();
        storage.save(&record("dQw4w9WgXcQ")).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("dQw4w9WgXcQ.txt")).unwrap();
        assert!(text.starts_with("Title: A Title\n"));

        let meta: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("dQw4w9WgXcQ_meta.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(meta["title"], "A Title");
        assert_eq!(meta["channel"], "A Channel");
    }

    #[tokio::test]
    async fn test_save_without_info_skips_meta() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();
        let record = TranscriptRecord {
            video_id: "dQw4w9WgXcQ".to_string(),
            info: None,
            text: Some("text".to_string()),
        };
        storage.save(&record).await.unwrap();

        assert!(storage.text_path("dQw4w9WgXcQ").exists());
        assert!(!storage.meta_path("dQw4w9WgXcQ").exists());
    }

    #[tokio::test]
    async fn test_round_trip_through_fresh_cache() {
        let dir = tempfile::tempdir().unwrap();
        let original = record("dQw4w9WgXcQ");
        {
            let cache = TranscriptCache::new(DiskStorage::open(dir.path()).unwrap());
            cache.insert(original.clone()).await.unwrap();
        }

        let cache = TranscriptCache::new(DiskStorage::open(dir.path()).unwrap());
        assert_eq!(cache.rehydrate().await, 1);
        let restored = cache.lookup("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn test_deleted_meta_rehydrates_without_info() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();
        let original = record("dQw4w9WgXcQ");
        storage.save(&original).await.unwrap();
        std::fs::remove_file(storage.meta_path("dQw4w9WgXcQ")).unwrap();

        let loaded = storage.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].info.is_none());
        assert_eq!(loaded[0].text, original.text);
    }

    #[tokio::test]
    async fn test_corrupt_meta_rehydrates_without_info() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::open(dir.path()).unwrap();
        let original = record("dQw4w9WgXcQ");
        storage.save(&original).await.unwrap();
        std::fs::write(storage.meta_path("dQw4w9WgXcQ"), "{not json").unwrap();

        let loaded = storage.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].info.is_none());
        assert_eq!(loaded[0].text, original.text);
    }

    #[tokio::test]
    async fn test_meta_with_missing_fields_uses_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.txt"), "text").unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ_meta.json"), r#"{"title":"Only"}"#).unwrap();

        let storage = DiskStorage::open(dir.path()).unwrap();
        let loaded = storage.load_all().await.unwrap();
        let info = loaded[0].info.as_ref().unwrap();
        assert_eq!(info.title, "Only");
        assert_eq!(info.channel, UNKNOWN_CHANNEL);
    }

    #[tokio::test]
    async fn test_unrelated_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "hello").unwrap();
        std::fs::write(dir.path().join("orphan_meta.json"), r#"{"title":"x","channel":"y"}"#)
            .unwrap();
        std::fs::write(dir.path().join("orphan_meta.txt"), "stray").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let storage = DiskStorage::open(dir.path()).unwrap();
        assert!(storage.load_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        let storage = DiskStorage::open(&root).unwrap();
        assert!(root.is_dir());

        let loaded = tokio_test::block_on(storage.load_all()).unwrap();
        assert!(loaded.is_empty());
    }
}
