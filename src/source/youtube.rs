//! YouTube caption provider.
//!
//! Reads the player response embedded in the watch page, picks a caption
//! track and downloads its timed-text XML.

use super::{CaptionSegment, TranscriptProvider};
use crate::error::{Result, TubecacheError};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

/// Caption track as listed in the player response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// `"asr"` for auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Caption provider that talks to youtube.com directly.
pub struct YoutubeCaptions {
    client: reqwest::Client,
    languages: Vec<String>,
    text_regex: Regex,
}

impl YoutubeCaptions {
    /// Create a provider preferring the given language codes, in order.
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        let text_regex = Regex::new(
            r#"(?s)<text start="([^"]*)"(?:\s+dur="([^"]*)")?[^>]*>(.*?)</text>"#,
        )
        .expect("Invalid regex");

        Self {
            client,
            languages,
            text_regex,
        }
    }

    async fn get_text(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Pick a track: preferred languages first, manual before generated.
    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        for language in &self.languages {
            let mut matching = tracks
                .iter()
                .filter(|t| t.language_code.eq_ignore_ascii_case(language));
            let preferred = matching.clone().find(|t| !t.is_generated());
            if let Some(track) = preferred.or_else(|| matching.next()) {
                return Some(track);
            }
        }
        tracks.first()
    }

    /// Parse timed-text XML into segments.
    fn parse_timed_text(&self, xml: &str) -> Vec<CaptionSegment> {
        self.text_regex
            .captures_iter(xml)
            .filter_map(|caps| {
                let start: f64 = caps.get(1)?.as_str().parse().ok()?;
                let duration = caps
                    .get(2)
                    .and_then(|d| d.as_str().parse().ok())
                    .unwrap_or(0.0);
                let text = decode_caption_text(caps.get(3).map_or("", |m| m.as_str()));
                Some(CaptionSegment {
                    start,
                    duration,
                    text,
                })
            })
            .collect()
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeCaptions {
    #[instrument(skip(self))]
    async fn fetch_segments(&self, video_id: &str) -> Result<Vec<CaptionSegment>> {
        let unavailable = |reason: String| TubecacheError::transcript_unavailable(video_id, reason);

        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let html = self
            .get_text(&watch_url)
            .await
            .map_err(|e| unavailable(format!("failed to load video page: {}", e)))?;

        let player = extract_player_response(&html)
            .ok_or_else(|| unavailable("video page did not contain player data".to_string()))?;

        check_playability(&player).map_err(unavailable)?;

        let tracks = caption_tracks(&player);
        debug!("Found {} caption tracks", tracks.len());
        let track = self
            .select_track(&tracks)
            .ok_or_else(|| unavailable("no captions are available for this video".to_string()))?;

        info!(
            "Downloading {} captions ({})",
            track.language_code,
            if track.is_generated() { "auto-generated" } else { "manual" }
        );
        let xml = self
            .get_text(&track.base_url)
            .await
            .map_err(|e| unavailable(format!("failed to download captions: {}", e)))?;

        let segments = self.parse_timed_text(&xml);
        if segments.is_empty() {
            return Err(unavailable("caption track contained no text".to_string()));
        }

        Ok(segments)
    }
}

/// Decode the JSON object that follows the player response marker.
fn extract_player_response(html: &str) -> Option<Value> {
    let start = html.find(PLAYER_RESPONSE_MARKER)? + PLAYER_RESPONSE_MARKER.len();
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Value>()
        .next()?
        .ok()
}

fn check_playability(player: &Value) -> std::result::Result<(), String> {
    let status = &player["playabilityStatus"];
    match status["status"].as_str() {
        None | Some("OK") => Ok(()),
        Some(other) => {
            let reason = status["reason"].as_str().unwrap_or(other);
            Err(format!("video is unavailable: {}", reason))
        }
    }
}

fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| serde_json::from_value(t.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Caption text arrives entity-encoded, sometimes twice.
fn decode_caption_text(raw: &str) -> String {
    let once = html_escape::decode_html_entities(raw);
    let twice = html_escape::decode_html_entities(&once);
    twice.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(languages: &[&str]) -> YoutubeCaptions {
        YoutubeCaptions::new(
            reqwest::Client::new(),
            languages.iter().map(|l| l.to_string()).collect(),
        )
    }

    fn track(language: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{}", language),
            language_code: language.to_string(),
            kind: kind.map(String::from),
        }
    }

    #[test]
    fn test_parse_timed_text() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0" dur="1.5">Hello</text>
<text start="65.25" dur="2">It&amp;#39;s a
new line</text>
<text start="70">No duration</text>
</transcript>"#;
        let segments = provider(&["en"]).parse_timed_text(xml);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], CaptionSegment { start: 0.0, duration: 1.5, text: "Hello".into() });
        assert_eq!(segments[1].start, 65.25);
        assert_eq!(segments[1].text, "It's a new line");
        assert_eq!(segments[2].duration, 0.0);
    }

    #[test]
    fn test_extract_player_response() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://example.com/tt","languageCode":"en"}]}}};var meta = {};</script>"#;
        let player = extract_player_response(html).unwrap();
        assert!(check_playability(&player).is_ok());
        let tracks = caption_tracks(&player);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].base_url, "https://example.com/tt");
    }

    #[test]
    fn test_missing_player_response() {
        assert!(extract_player_response("<html></html>").is_none());
    }

    #[test]
    fn test_unplayable_video() {
        let player: Value = serde_json::json!({
            "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" }
        });
        let err = check_playability(&player).unwrap_err();
        assert!(err.contains("Video unavailable"));
        assert!(caption_tracks(&player).is_empty());
    }

    #[test]
    fn test_select_track_prefers_language_then_manual() {
        let tracks = vec![
            track("de", None),
            track("en", Some("asr")),
            track("en", None),
        ];
        let selected = provider(&["en"]).select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(!selected.is_generated());

        let selected = provider(&["fr", "de"]).select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "de");

        let selected = provider(&["fr"]).select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "de");

        assert!(provider(&["en"]).select_track(&[]).is_none());
    }

    #[test]
    fn test_generated_track_used_when_only_option() {
        let tracks = vec![track("en", Some("asr"))];
        let selected = provider(&["en"]).select_track(&tracks).unwrap();
        assert!(selected.is_generated());
    }
}
