//! Provider abstraction for video metadata and captions.
//!
//! Provides a trait-based interface so the pipeline can run against YouTube
//! or against substitute providers in tests.

mod http;
mod oembed;
mod youtube;

pub use http::create_client;
pub use oembed::OEmbedMetadata;
pub use youtube::YoutubeCaptions;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Title used when metadata could not be fetched.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Channel used when metadata could not be fetched.
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Metadata about a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Canonical video ID.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Channel or author name.
    pub channel: String,
}

impl VideoInfo {
    pub fn new(video_id: &str, title: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: title.into(),
            channel: channel.into(),
        }
    }

    /// Info with placeholder title and channel.
    pub fn placeholder(video_id: &str) -> Self {
        Self::new(video_id, UNKNOWN_TITLE, UNKNOWN_CHANNEL)
    }
}

/// A single caption segment as supplied by a transcript provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds (0 when the provider does not report one).
    pub duration: f64,
    /// Spoken text.
    pub text: String,
}

impl CaptionSegment {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration: 0.0,
            text: text.into(),
        }
    }
}

/// Best-effort lookup of video metadata.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch title and channel for a video.
    ///
    /// Never fails: implementations return [`VideoInfo::placeholder`] when
    /// the lookup does not succeed.
    async fn fetch_info(&self, video_id: &str) -> VideoInfo;
}

/// Source of time-coded captions.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch caption segments in chronological order.
    ///
    /// Fails with `TranscriptUnavailable` when the video has no usable captions.
    async fn fetch_segments(&self, video_id: &str) -> Result<Vec<CaptionSegment>>;
}
