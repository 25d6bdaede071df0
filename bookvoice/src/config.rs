//! bookvoice configuration and API-key handling.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::text::chunker::DEFAULT_MAX_CHARS;
use crate::tts::DEFAULT_VOICE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookvoiceConfig {
    /// OpenAI API key. The OPENAI_API_KEY environment variable takes
    /// precedence over this field.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default TTS voice
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Maximum characters per synthesis request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for BookvoiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice: default_voice(),
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

impl BookvoiceConfig {
    /// Get the config file path: ~/.config/bookvoice/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("bookvoice").join("config.toml"))
    }

    /// Load config from file, returning defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: BookvoiceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Resolve the API key: environment first, then the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context(
                "no API key found: set OPENAI_API_KEY or add api_key to the config file",
            )
    }
}

/// Mask an API key for logging: first 4 and last 4 characters visible.
pub fn mask_api_key(key: &str) -> String {
    // Indexed by character, not byte; a config-file key is arbitrary text.
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return "[EMPTY OR INVALID KEY]".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

static API_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Replace any `sk-...` tokens in a message with their masked form, so
/// error text from the API can be logged safely.
pub fn mask_api_keys(message: &str) -> String {
    let pattern = API_KEY_PATTERN.get_or_init(|| {
        Regex::new(r"sk-[A-Za-z0-9_-]+").expect("API key pattern is valid")
    });

    pattern
        .replace_all(message, |caps: &regex::Captures| mask_api_key(&caps[0]))
        .into_owned()
}
