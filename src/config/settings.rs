//! Configuration settings for tubecache.

use crate::error::TubecacheError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding cached transcripts. Relative paths resolve against
    /// the working directory.
    pub cache_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            cache_dir: "transcript_cache".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Preferred caption languages, most preferred first.
    pub languages: Vec<String>,
    /// Timeout for each outbound request, in seconds.
    pub request_timeout_secs: u64,
    /// User agent sent with outbound requests.
    pub user_agent: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(TubecacheError::Config(format!(
                    "config file not found: {}",
                    config_path.display()
                )));
            }
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.youtube.languages.is_empty() {
            return Err(TubecacheError::Config(
                "youtube.languages must name at least one language".to_string(),
            ));
        }
        if self.youtube.request_timeout_secs == 0 {
            return Err(TubecacheError::Config(
                "youtube.request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubecache")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded cache directory path.
    pub fn cache_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.cache_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cache_dir(), PathBuf::from("transcript_cache"));
        assert_eq!(settings.youtube.languages, vec!["en".to_string()]);
        assert_eq!(settings.youtube.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [general]
            cache_dir = "/var/cache/transcripts"

            [youtube]
            languages = ["de", "en"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.cache_dir(), PathBuf::from("/var/cache/transcripts"));
        assert_eq!(settings.general.log_level, "info");
        assert_eq!(settings.youtube.languages, vec!["de", "en"]);
        assert_eq!(settings.youtube.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_from_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, TubecacheError::Config(_)));
    }

    #[test]
    fn test_empty_languages_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[youtube]\nlanguages = []\n").unwrap();
        let err = Settings::load_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("youtube.languages"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").unwrap();
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.log_level, "debug");
    }
}
