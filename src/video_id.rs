//! Normalization of YouTube video references.
//!
//! Accepts full watch URLs, short `youtu.be` links and bare 11-character IDs,
//! and reduces them all to the canonical video ID.

use crate::error::{Result, TubecacheError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];
const MAIN_SITE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

static CANONICAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"));

/// Extract the canonical video ID from a URL or bare ID.
pub fn extract_video_id(reference: &str) -> Result<String> {
    let reference = reference.trim();
    let invalid = || TubecacheError::InvalidReference(reference.to_string());

    if let Some(url) = parse_url(reference) {
        let host = url.host_str().unwrap_or_default();

        if SHORT_LINK_HOSTS.contains(&host) {
            let id = url
                .path_segments()
                .and_then(|mut segments| segments.find(|s| !s.is_empty()))
                .ok_or_else(invalid)?;
            return checked(id).ok_or_else(invalid);
        }

        if MAIN_SITE_HOSTS.contains(&host) {
            let id = url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .ok_or_else(invalid)?;
            return checked(&id).ok_or_else(invalid);
        }
    }

    if is_canonical(reference) {
        return Ok(reference.to_string());
    }

    Err(invalid())
}

/// Whether the input already has the canonical ID shape.
pub fn is_canonical(candidate: &str) -> bool {
    CANONICAL_ID.is_match(candidate)
}

/// Parse as a URL, tolerating a missing scheme (`youtu.be/ID`).
fn parse_url(reference: &str) -> Option<Url> {
    let with_host = |url: Url| url.host_str().is_some().then_some(url);

    if let Some(url) = Url::parse(reference).ok().and_then(with_host) {
        return Some(url);
    }
    if !reference.contains('.') {
        return None;
    }
    Url::parse(&format!("https://{}", reference))
        .ok()
        .and_then(with_host)
}

/// IDs become file names, so only identifier characters are allowed.
fn checked(id: &str) -> Option<String> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then(|| id.to_string())
}
