//! MCP tool, resource and prompt catalogs for tubecache.

use super::protocol::{Prompt, PromptArgument, Resource, ResourceTemplate, Tool};
use serde_json::json;

pub const TRANSCRIPT_URI_PREFIX: &str = "transcript://";
pub const LIST_URI: &str = "transcripts://list";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "download_transcript".to_string(),
            description: "Download a video transcript from YouTube. \
                Returns the formatted transcript text with timestamps, served from the local \
                cache when it has been downloaded before."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "youtube_url": {
                        "type": "string",
                        "description": "URL of the YouTube video, or its 11-character video ID"
                    }
                },
                "required": ["youtube_url"]
            }),
        },
        Tool {
            name: "list_available_transcripts".to_string(),
            description: "List all transcripts that have been downloaded and cached."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

/// Static resources.
pub fn get_resources() -> Vec<Resource> {
    vec![Resource {
        uri: LIST_URI.to_string(),
        name: "Available transcripts".to_string(),
        description: "List all available transcripts".to_string(),
        mime_type: "text/plain".to_string(),
    }]
}

/// Parameterized resources.
pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        uri_template: format!("{}{{video_id}}", TRANSCRIPT_URI_PREFIX),
        name: "Video transcript".to_string(),
        description: "Get transcript by video ID, downloading if necessary".to_string(),
        mime_type: "text/plain".to_string(),
    }]
}

/// Get all available prompts.
pub fn get_prompts() -> Vec<Prompt> {
    let video_id = PromptArgument {
        name: "video_id".to_string(),
        description: "YouTube video ID of the transcript".to_string(),
        required: true,
    };

    vec![
        Prompt {
            name: "summarize_transcript".to_string(),
            description: "Create a prompt to summarize a specific transcript".to_string(),
            arguments: vec![video_id.clone()],
        },
        Prompt {
            name: "highlight_new_information".to_string(),
            description: "Create a prompt to identify new or unusual information in a transcript"
                .to_string(),
            arguments: vec![
                video_id,
                PromptArgument {
                    name: "topic".to_string(),
                    description: "Topic to look for".to_string(),
                    required: true,
                },
            ],
        },
    ]
}

/// A resource address understood by the server.
#[derive(Debug, PartialEq, Eq)]
pub enum ResourceTarget<'a> {
    Transcript(&'a str),
    List,
}

/// Resolve a resource URI.
pub fn parse_resource_uri(uri: &str) -> Option<ResourceTarget<'_>> {
    if uri == LIST_URI {
        return Some(ResourceTarget::List);
    }
    uri.strip_prefix(TRANSCRIPT_URI_PREFIX)
        .filter(|id| !id.is_empty())
        .map(ResourceTarget::Transcript)
}
