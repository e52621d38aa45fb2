// Application Configuration
//
// *La Configuration* (The Configuration) - Recommender, storage and logging settings

use anyhow::{Context, Result};
use leconseil::{
    default_fallback_pool, ContentItem, KeywordExtractor, RecommenderOptions, RelevanceScorer,
    DEFAULT_CANDIDATE_POOL_SIZE, DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_VOCABULARY,
};
use lestockage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".leconseil/config.toml";

/// Environment variable overriding the database path
pub const ENV_DB_PATH: &str = "LECONSEIL_DB_PATH";

/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "LECONSEIL_LOG_LEVEL";

/// Environment variable overriding the default recommendation limit
pub const ENV_DEFAULT_LIMIT: &str = "LECONSEIL_DEFAULT_LIMIT";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Recommendation settings
    pub recommender: RecommenderConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    /// Save configuration as pretty TOML, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();
        if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(config_path, toml_string)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// Environment variables:
    /// - `LECONSEIL_DB_PATH` - Database path
    /// - `LECONSEIL_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
    /// - `LECONSEIL_DEFAULT_LIMIT` - Default number of recommendations
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup(ENV_DB_PATH) {
            self.storage.db_path = db_path;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        if let Some(limit) = lookup(ENV_DEFAULT_LIMIT) {
            match limit.trim().parse::<usize>() {
                Ok(limit) => self.recommender.default_limit = limit,
                Err(e) => warn!(
                    "Ignoring {}={:?}: {}; keeping default_limit = {}",
                    ENV_DEFAULT_LIMIT, limit, e, self.recommender.default_limit
                ),
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.recommender.validate()?;

        if self.storage.db_path.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.db_path cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Recommendation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Recommendations returned when no limit is given
    pub default_limit: usize,

    /// Recent candidates fetched from storage per request
    pub candidate_pool_size: usize,

    /// Only consider candidates in the current article's category
    pub same_category_only: bool,

    /// Keyword vocabulary
    pub vocabulary: Vec<String>,

    /// Articles ranked when storage is empty or failing
    pub fallback: Vec<ContentItem>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RECOMMENDATION_LIMIT,
            candidate_pool_size: DEFAULT_CANDIDATE_POOL_SIZE,
            same_category_only: false,
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            fallback: default_fallback_pool(),
        }
    }
}

impl RecommenderConfig {
    /// Check settings that would make recommendations meaningless
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.candidate_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "recommender.candidate_pool_size must be greater than zero".to_string(),
            ));
        }

        if self.vocabulary.iter().all(|term| term.is_empty()) {
            return Err(ConfigError::Invalid(
                "recommender.vocabulary must contain at least one term".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for item in &self.fallback {
            item.validate()
                .map_err(|e| ConfigError::Invalid(format!("recommender.fallback: {e}")))?;
            if !seen.insert(item.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "recommender.fallback contains duplicate id {}",
                    item.id
                )));
            }
        }

        Ok(())
    }

    /// Scorer over the configured vocabulary
    pub fn scorer(&self) -> RelevanceScorer {
        RelevanceScorer::with_extractor(KeywordExtractor::with_vocabulary(
            self.vocabulary.iter().cloned(),
        ))
    }

    /// Options for the recommender
    pub fn options(&self) -> RecommenderOptions {
        RecommenderOptions {
            default_limit: self.default_limit,
            candidate_pool_size: self.candidate_pool_size,
            same_category_only: self.same_category_only,
            fallback_pool: self.fallback.clone(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration contains invalid values or settings
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
