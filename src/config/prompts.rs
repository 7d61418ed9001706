//! Prompt templates for tubecache.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summarize: SummarizePrompt,
    pub highlight: HighlightPrompt,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt asking for a summary of one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizePrompt {
    pub template: String,
}

impl Default for SummarizePrompt {
    fn default() -> Self {
        Self {
            template: r#"Please provide a concise summary of this YouTube video transcript.
Focus on the main topics, key points, and conclusions.
Structure your summary with an introduction, main points, and conclusion.

Please use the following transcript as your source:
{{read 'transcript://{{video_id}}' }}
"#
                .to_string(),
        }
    }
}

/// Prompt asking for new or unusual information on a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightPrompt {
    pub template: String,
}

impl Default for HighlightPrompt {
    fn default() -> Self {
        Self {
            template: r#"Please analyze this YouTube video transcript and highlight any new,
unusual, or particularly insightful information about "{{topic}}".

Focus on:
1. Information that contradicts conventional wisdom
2. Novel approaches or perspectives
3. Surprising facts or statistics
4. Cutting-edge research or developments
5. Unique insights from the speaker's experience

For each point, explain why it is significant or how it differs from common knowledge.

Please use the following transcript as your source:
{{read 'transcript://{{video_id}}' }}
"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summarize_path = custom_path.join("summarize.toml");
            if summarize_path.exists() {
                let content = std::fs::read_to_string(&summarize_path)?;
                prompts.summarize = toml::from_str(&content)?;
            }

            let highlight_path = custom_path.join("highlight.toml");
            if highlight_path.exists() {
                let content = std::fs::read_to_string(&highlight_path)?;
                prompts.highlight = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substituted values are never rescanned; unknown placeholders are kept.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Summary prompt for a video.
    pub fn summarize_transcript(&self, video_id: &str) -> String {
        let vars = HashMap::from([("video_id".to_string(), video_id.to_string())]);
        self.render_with_custom(&self.summarize.template, &vars)
    }

    /// Novel-information prompt for a video and topic.
    pub fn highlight_new_information(&self, video_id: &str, topic: &str) -> String {
        let vars = HashMap::from([
            ("video_id".to_string(), video_id.to_string()),
            ("topic".to_string(), topic.to_string()),
        ]);
        self.render_with_custom(&self.highlight.template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_summarize_references_resource() {
        let prompt = Prompts::default().summarize_transcript("dQw4w9WgXcQ");
        assert!(prompt.ends_with("{{read 'transcript://dQw4w9WgXcQ' }}\n"));
        assert!(!prompt.contains("{{video_id}}"));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let prompts = Prompts::default();
        let first = prompts.highlight_new_information("dQw4w9WgXcQ", "{{video_id}}");
        assert!(first.contains("about \"{{video_id}}\"."));
        assert!(first.contains("transcript://dQw4w9WgXcQ"));
        for _ in 0..50 {
            assert_eq!(prompts.highlight_new_information("dQw4w9WgXcQ", "{{video_id}}"), first);
        }

        let vars = HashMap::from([("who".to_string(), "{{topic}}".to_string())]);
        let custom = Prompts {
            variables: vars,
            ..Prompts::default()
        };
        assert_eq!(
            custom.render_with_custom(
                "{{who}} on {{topic}} {{missing}}",
                &HashMap::from([("topic".to_string(), "bees".to_string())])
            ),
            "{{topic}} on bees {{missing}}"
        );
    }

    #[test]
    fn test_highlight_interpolates_topic() {
        let prompt = Prompts::default().highlight_new_information("dQw4w9WgXcQ", "sleep science");
        assert!(prompt.contains("\"sleep science\""));
        assert!(prompt.contains("transcript://dQw4w9WgXcQ"));
    }

    #[test]
    fn test_custom_variables_and_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("summarize.toml"),
            "template = \"Summarize transcript://{{video_id}} for {{audience}}.\"\n",
        )
        .unwrap();
        let vars = HashMap::from([("audience".to_string(), "students".to_string())]);

        let prompts = Prompts::load(dir.path().to_str(), Some(&vars)).unwrap();
        assert_eq!(
            prompts.summarize_transcript("abc_DEF-123"),
            "Summarize transcript://abc_DEF-123 for students."
        );
    }
}
