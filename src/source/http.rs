//! Shared HTTP client configuration.

use crate::config::YoutubeSettings;
use crate::error::Result;
use std::time::Duration;

/// Create an HTTP client with the configured timeout and user agent.
///
/// The timeout bounds every outbound metadata and caption request.
pub fn create_client(settings: &YoutubeSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}
