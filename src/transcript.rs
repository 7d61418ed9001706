//! Display formatting for transcripts and the cached-transcript listing.

use crate::cache::TranscriptRecord;
use crate::source::{CaptionSegment, VideoInfo, UNKNOWN_CHANNEL, UNKNOWN_TITLE};
use std::fmt::Write;

/// Message returned when nothing has been cached yet.
pub const EMPTY_LISTING: &str = "No transcripts have been downloaded yet.";

/// Render a transcript with a metadata header and `[MM:SS]` line prefixes.
pub fn format_transcript(video_id: &str, info: &VideoInfo, segments: &[CaptionSegment]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Title: {}", info.title);
    let _ = writeln!(output, "Channel: {}", info.channel);
    let _ = writeln!(output, "Video ID: {}", video_id);
    output.push('\n');
    output.push_str("TRANSCRIPT:\n");

    for segment in segments {
        let _ = writeln!(output, "{} {}", format_timestamp(segment.start), segment.text);
    }

    output
}

/// Format an offset as `[MM:SS]`, truncating sub-second precision.
///
/// Minutes are not wrapped into hours. Negative or non-finite offsets render
/// as `[00:00]`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("[{:02}:{:02}]", total / 60, total % 60)
}

/// Render cached records as a numbered list.
pub fn format_listing(records: &[TranscriptRecord]) -> String {
    if records.is_empty() {
        return EMPTY_LISTING.to_string();
    }

    let mut output = String::from("Available Transcripts:\n\n");
    for (i, record) in records.iter().enumerate() {
        let (title, channel) = match &record.info {
            Some(info) => (info.title.as_str(), info.channel.as_str()),
            None => (UNKNOWN_TITLE, UNKNOWN_CHANNEL),
        };
        let _ = writeln!(output, "{}. {}", i + 1, title);
        let _ = writeln!(output, "   Channel: {}", channel);
        let _ = writeln!(output, "   ID: {}", record.video_id);
    }
    output
}
