//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the case-law browsing client: remote API
//! location and timeouts, logging, and the canonical facet catalog consumed
//! by every presentation surface.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Non-empty base URL, positive timeout
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`LAWSEARCH_*`)
//! 2. Configuration file
//! 3. Default values
//!
//! The facet catalog is the single source of truth for the court, topic,
//! district and year enumerations; presentation variants must not carry
//! their own copies.

use crate::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings
    pub api: ApiConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Canonical facet enumerations
    pub facets: FacetCatalog,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the search service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

/// The single canonical table of facet values.
///
/// The default values mirror the enumerations of the production service
/// (Israeli courts, districts and case topics). Deployments against another
/// corpus override them in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetCatalog {
    /// Selectable court names
    pub courts: Vec<String>,
    /// Selectable document types / topics
    pub topics: Vec<String>,
    /// Selectable districts
    pub districts: Vec<String>,
    /// Selectable years, most recent first; the "all" sentinel is implicit
    pub years: Vec<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ClientError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ClientError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("LAWSEARCH_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("LAWSEARCH_TIMEOUT_SECONDS") {
            self.api.timeout_seconds = timeout.parse().map_err(|_| ClientError::Config {
                message: "Invalid value in LAWSEARCH_TIMEOUT_SECONDS".to_string(),
            })?;
        }
        if let Ok(level) = std::env::var("LAWSEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ClientError::Config {
                message: "api.base_url cannot be empty".to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ClientError::Config {
                message: "api.timeout_seconds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            facets: FacetCatalog::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8501".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for FacetCatalog {
    fn default() -> Self {
        Self {
            courts: vec![
                "בית המשפט העליון".to_string(),
                "בתי הדין לעבודה".to_string(),
                "בתי המשפט המחוזיים".to_string(),
                "בתי המשפט לענייני משפחה".to_string(),
                "בתי המשפט לעניינים מקומיים".to_string(),
                "בתי המשפט לתביעות קטנות".to_string(),
                "בתי המשפט לתעבורה".to_string(),
                "בתי משפט השלום".to_string(),
                "בתי משפט לנוער".to_string(),
                "ועדות שחרורים".to_string(),
            ],
            topics: vec![
                "אזרחי".to_string(),
                "בג\"ץ".to_string(),
                "ועדות שחרורים".to_string(),
                "משפחה".to_string(),
                "נוער".to_string(),
                "עבודה".to_string(),
                "עניינים כלכליים".to_string(),
                "עניינים מנהליים".to_string(),
                "פלילי".to_string(),
                "שאר הנושאים".to_string(),
                "תעבורה".to_string(),
                "אין מידע".to_string(),
            ],
            districts: vec![
                "מחוז תל-אביב".to_string(),
                "מחוז חיפה".to_string(),
                "מחוז מרכז".to_string(),
                "מחוז דרום".to_string(),
                "מחוז ירושלים".to_string(),
                "מחוז צפון".to_string(),
                "בית המשפט העליון".to_string(),
                "אין מידע".to_string(),
            ],
            years: (2015..=2025).rev().map(|y| y.to_string()).collect(),
        }
    }
}
