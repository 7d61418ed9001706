//! List command implementation.

use crate::cache::{DiskStorage, TranscriptCache};
use crate::cli::Output;
use crate::config::Settings;
use crate::source::{UNKNOWN_CHANNEL, UNKNOWN_TITLE};
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let cache = TranscriptCache::new(DiskStorage::open(settings.cache_dir())?);
    cache.rehydrate().await;
    let records = cache.list_all().await;

    if records.is_empty() {
        Output::info("No transcripts cached yet. Use 'tubecache download <url>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Cached Transcripts ({})", records.len()));
    println!();
    for (i, record) in records.iter().enumerate() {
        let (title, channel) = record
            .info
            .as_ref()
            .map(|info| (info.title.as_str(), info.channel.as_str()))
            .unwrap_or((UNKNOWN_TITLE, UNKNOWN_CHANNEL));
        Output::transcript_entry(i + 1, title, channel, &record.video_id);
    }

    Ok(())
}
