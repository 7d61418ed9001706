//! Error types for tubecache.

use thiserror::Error;

/// Library-level error type for tubecache operations.
#[derive(Error, Debug)]
pub enum TubecacheError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not extract a YouTube video ID from '{0}'")]
    InvalidReference(String),

    #[error("Transcript unavailable for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("Metadata unavailable for video {video_id}: {reason}")]
    MetadataUnavailable { video_id: String, reason: String },

    #[error("Failed to persist transcript {video_id}: {reason}")]
    PersistenceFailure { video_id: String, reason: String },

    #[error("Corrupt cache entry {path}: {reason}")]
    CorruptCacheEntry { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TubecacheError {
    /// Build a `TranscriptUnavailable` error from any displayable cause.
    pub fn transcript_unavailable(video_id: &str, reason: impl std::fmt::Display) -> Self {
        TubecacheError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is meant to be shown to the caller.
    ///
    /// Everything else is logged and degraded around.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TubecacheError::InvalidReference(_) | TubecacheError::TranscriptUnavailable { .. }
        )
    }
}

/// Result type alias for tubecache operations.
pub type Result<T> = std::result::Result<T, TubecacheError>;
