//! tubecache - YouTube transcript fetching and caching
//!
//! Fetches time-coded YouTube transcripts together with video metadata,
//! formats them into a plain-text document, and keeps every result in a
//! cache mirrored to disk so repeat requests never hit the network.
//!
//! # Architecture
//!
//! - `video_id` - Extracting canonical video IDs from URLs and bare IDs
//! - `source` - Metadata (oEmbed) and caption providers
//! - `transcript` - Formatting transcripts and cache listings
//! - `cache` - In-memory cache with a pluggable persistent mirror
//! - `orchestrator` - Cache-first fetch pipeline
//! - `mcp` - Model Context Protocol server over stdio
//! - `config` - Configuration and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use tubecache::config::Settings;
//! use tubecache::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings).await?;
//!
//!     let fetched = orchestrator
//!         .fetch_transcript("https://youtu.be/dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}", fetched.text);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod orchestrator;
pub mod source;
pub mod transcript;
pub mod video_id;

pub use error::{Result, TubecacheError};
