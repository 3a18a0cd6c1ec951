//! Configuration management for the resume tailor

use crate::error::{Result, ResumeTailorError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the text generation credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the configured model name.
pub const MODEL_ENV: &str = "OPENAI_MODEL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Only ever sourced from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl LlmConfig {
    /// True when a text generation credential is available.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Apply credential and model overrides from an environment lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());

        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            debug!("Model overridden from environment: {}", model);
            self.model = model;
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content)
                .map_err(|e| ResumeTailorError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        config.llm.apply_env_with(|key| std::env::var(key).ok());

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeTailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }
}
