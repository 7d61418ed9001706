//! CLI module for tubecache.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tubecache - cached YouTube transcripts
///
/// Fetches time-coded YouTube transcripts, formats them with timestamps and
/// metadata, and keeps them in a local cache. Run `tubecache mcp` to expose
/// the cache to AI assistants over the Model Context Protocol.
#[derive(Parser, Debug)]
#[command(name = "tubecache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Transcript cache directory (overrides the config file)
    #[arg(long, global = true, env = "TUBECACHE_CACHE_DIR")]
    pub cache_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Download a transcript (or print it from the cache)
    Download {
        /// YouTube URL or video ID
        input: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List cached transcripts
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
