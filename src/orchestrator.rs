//! Pipeline orchestrator for tubecache.
//!
//! Coordinates the fetch-format-store pipeline: normalize the reference,
//! check the cache, fetch captions and metadata, format, persist, return.

use crate::cache::{DiskStorage, TranscriptCache, TranscriptRecord};
use crate::config::Settings;
use crate::error::Result;
use crate::source::{
    create_client, MetadataProvider, OEmbedMetadata, TranscriptProvider, YoutubeCaptions,
};
use crate::transcript::{format_listing, format_transcript};
use crate::video_id::extract_video_id;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Where a returned transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Served from the cache without any outbound request.
    Cached,
    /// Fetched, formatted and stored by this call.
    Fresh,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    /// Canonical video ID.
    pub video_id: String,
    /// Formatted transcript text.
    pub text: String,
    pub origin: Origin,
}

/// The main orchestrator for the tubecache pipeline.
pub struct Orchestrator {
    cache: Arc<TranscriptCache>,
    metadata: Arc<dyn MetadataProvider>,
    transcripts: Arc<dyn TranscriptProvider>,
}

impl Orchestrator {
    /// Create an orchestrator backed by YouTube and the configured cache directory.
    ///
    /// The cache is rehydrated from disk before this returns.
    pub async fn new(settings: &Settings) -> Result<Self> {
        let client = create_client(&settings.youtube)?;
        let storage = DiskStorage::open(settings.cache_dir())?;
        info!("Using transcript cache at {}", storage.root().display());

        let cache = Arc::new(TranscriptCache::new(storage));
        cache.rehydrate().await;

        Ok(Self::with_components(
            cache,
            Arc::new(OEmbedMetadata::new(client.clone())),
            Arc::new(YoutubeCaptions::new(client, settings.youtube.languages.clone())),
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        cache: Arc<TranscriptCache>,
        metadata: Arc<dyn MetadataProvider>,
        transcripts: Arc<dyn TranscriptProvider>,
    ) -> Self {
        Self {
            cache,
            metadata,
            transcripts,
        }
    }

    /// Get a reference to the cache.
    pub fn cache(&self) -> Arc<TranscriptCache> {
        self.cache.clone()
    }

    /// Run the full pipeline for a raw reference (URL or ID).
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn fetch_transcript(&self, reference: &str) -> Result<FetchedTranscript> {
        let video_id = extract_video_id(reference)?;
        self.transcript_for_id(&video_id).await
    }

    /// Run the pipeline for an already-normalized video ID.
    pub async fn transcript_for_id(&self, video_id: &str) -> Result<FetchedTranscript> {
        if let Some(text) = self.cache.lookup(video_id).await.and_then(|r| r.text) {
            info!("Returning cached transcript for video {}", video_id);
            return Ok(FetchedTranscript {
                video_id: video_id.to_string(),
                text,
                origin: Origin::Cached,
            });
        }

        info!("Downloading transcript for video {}", video_id);
        let (segments, video_info) = tokio::join!(
            self.transcripts.fetch_segments(video_id),
            self.metadata.fetch_info(video_id),
        );
        let segments = segments?;

        let text = format_transcript(video_id, &video_info, &segments);
        info!(
            "Fetched {} caption segments for '{}'",
            segments.len(),
            video_info.title
        );

        let record = TranscriptRecord::complete(video_info, text.clone());
        if let Err(e) = self.cache.insert(record).await {
            warn!("{}", e);
        }

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            text,
            origin: Origin::Fresh,
        })
    }

    /// Pipeline entry point for callers that consume plain text.
    ///
    /// Failures come back as a message prefixed with `Error:`.
    pub async fn download_transcript(&self, reference: &str) -> String {
        render(self.fetch_transcript(reference).await)
    }

    /// Like [`download_transcript`](Self::download_transcript) for a video ID.
    ///
    /// The ID still goes through normalization so it is never used as a file
    /// name unchecked.
    pub async fn transcript_resource(&self, video_id: &str) -> String {
        self.download_transcript(video_id).await
    }

    /// Render all cached transcripts as a numbered list.
    pub async fn list_available_transcripts(&self) -> String {
        format_listing(&self.cache.list_all().await)
    }
}

fn render(result: Result<FetchedTranscript>) -> String {
    match result {
        Ok(fetched) => fetched.text,
        Err(e) => {
            if e.is_user_facing() {
                warn!("{}", e);
            } else {
                error!("Unexpected pipeline failure: {}", e);
            }
            format!("Error: {}", e)
        }
    }
}
