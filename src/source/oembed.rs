//! Video metadata via YouTube's oEmbed endpoint.

use super::{MetadataProvider, VideoInfo, UNKNOWN_CHANNEL, UNKNOWN_TITLE};
use crate::error::{Result, TubecacheError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// oEmbed-backed metadata provider.
pub struct OEmbedMetadata {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
}

impl OEmbedMetadata {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: OEMBED_ENDPOINT.to_string(),
        }
    }

    async fn try_fetch(&self, video_id: &str) -> Result<VideoInfo> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TubecacheError::MetadataUnavailable {
                video_id: video_id.to_string(),
                reason: format!("oEmbed returned {}", status),
            });
        }

        let body = response.text().await?;
        parse_oembed(video_id, &body)
    }
}

#[async_trait]
impl MetadataProvider for OEmbedMetadata {
    #[instrument(skip(self))]
    async fn fetch_info(&self, video_id: &str) -> VideoInfo {
        match self.try_fetch(video_id).await {
            Ok(info) => info,
            Err(e) => {
                debug!("Metadata lookup failed, using placeholders: {}", e);
                VideoInfo::placeholder(video_id)
            }
        }
    }
}

/// Parse an oEmbed JSON body. Missing fields fall back to placeholders.
fn parse_oembed(video_id: &str, body: &str) -> Result<VideoInfo> {
    let oembed: OEmbedResponse = serde_json::from_str(body)?;
    Ok(VideoInfo::new(
        video_id,
        oembed.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        oembed
            .author_name
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
    ))
}
