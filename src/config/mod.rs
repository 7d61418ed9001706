//! Configuration module for tubecache.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{HighlightPrompt, Prompts, SummarizePrompt};
pub use settings::{GeneralSettings, PromptSettings, Settings, YoutubeSettings};
