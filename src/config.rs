//! Configuration management for job scout

use crate::error::{JobScoutError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    pub search: SearchConfig,
    pub vectorizer: VectorizerConfig,
    pub scoring: ScoringConfig,
    pub analysis: AnalysisConfig,
    pub advice: AdviceConfig,
    pub output: OutputConfig,
}

/// Secrets for the external collaborators. Empty strings mean "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub provider_api_key: String,
    pub source_app_id: String,
    pub source_app_key: String,
    pub rapidapi_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub country: String,
    pub results_per_page: usize,
    pub max_days_old: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub max_features: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub similarity_weight: f32,
    pub relevance_weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub gap_top_k: usize,
    pub advice_top_n: usize,
    pub frequent_window: usize,
    pub max_suggestions: usize,
    pub min_frequency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub base_url: String,
    pub candidate_models: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub display_limit: usize,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country: "in".to_string(),
            results_per_page: 10,
            max_days_old: 7,
            timeout_secs: 10,
        }
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_features: 1000 }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.7,
            relevance_weight: 0.3,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gap_top_k: 3,
            advice_top_n: 5,
            frequent_window: 20,
            max_suggestions: 5,
            min_frequency: 2,
        }
    }
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            candidate_models: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-pro".to_string(),
            ],
            timeout_secs: 60,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            display_limit: 5,
            color_output: true,
        }
    }
}

impl Config {
    /// Load `path`, writing defaults first if it does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        config.save_to(path)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| JobScoutError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobScoutError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-scout")
            .join("config.toml")
    }

    /// Overlay credentials from `JOB_SCOUT_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &mut self.credentials;
        if let Some(value) = lookup("JOB_SCOUT_PROVIDER_API_KEY") {
            creds.provider_api_key = value;
        }
        if let Some(value) = lookup("JOB_SCOUT_SOURCE_APP_ID") {
            creds.source_app_id = value;
        }
        if let Some(value) = lookup("JOB_SCOUT_SOURCE_APP_KEY") {
            creds.source_app_key = value;
        }
        if let Some(value) = lookup("JOB_SCOUT_RAPIDAPI_KEY") {
            creds.rapidapi_key = Some(value);
        }
    }
}

impl Credentials {
    pub fn has_provider_key(&self) -> bool {
        !self.provider_api_key.trim().is_empty()
    }

    pub fn has_source_keys(&self) -> bool {
        !self.source_app_id.trim().is_empty() && !self.source_app_key.trim().is_empty()
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}
