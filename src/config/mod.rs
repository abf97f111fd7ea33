//! Configuration for the cluster index.
//!
//! Configuration is loaded with precedence: overrides > Env vars > Config file > Defaults
//!
//! # Example config file (otu_index.toml)
//! ```toml
//! precision_steps = 1000
//! otu_separator = "\t"
//! element_separator = ","
//! wrap_width = 100
//! ```
//!
//! A loaded [`IndexConfig`] is validated once into [`IndexSettings`], which is
//! what the index works with.

mod defaults;

pub use defaults::*;

use crate::model::Threshold;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Raw configuration as read from file, environment and overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Clustering steps per unit of distance: 10 -> 0.1, 100 -> 0.01
    pub precision_steps: u32,
    /// Separator between the fields of a row
    pub otu_separator: String,
    /// Separator between the elements of one OTU
    pub element_separator: String,
    /// Column width for wrapped listings
    pub wrap_width: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            precision_steps: DEFAULT_PRECISION_STEPS,
            otu_separator: DEFAULT_OTU_SEPARATOR.to_string(),
            element_separator: DEFAULT_ELEMENT_SEPARATOR.to_string(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl IndexConfig {
    /// Load configuration with precedence: overrides > Env > File > Defaults
    ///
    /// # Arguments
    /// * `config_path` - Optional path to TOML config file
    /// * `overrides` - Caller overrides to apply on top
    pub fn load(
        config_path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(IndexConfig::default()));

        // Layer 1: Config file (if provided)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 2: Environment variables with OTU_INDEX_ prefix
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        // Layer 3: overrides
        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().map_err(ConfigError::from)
    }

    /// Load from environment and optional config file only (no overrides)
    pub fn from_env(config_path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load(config_path, ConfigOverrides::default())
    }

    /// Check every field once and derive the settings used by the index.
    pub fn validate(&self) -> Result<IndexSettings, ConfigError> {
        if self.precision_steps == 0 {
            return Err(ConfigError::new("precision_steps must be at least 1"));
        }
        if self.otu_separator.is_empty() {
            return Err(ConfigError::new("otu_separator must not be empty"));
        }
        if self.element_separator.is_empty() {
            return Err(ConfigError::new("element_separator must not be empty"));
        }
        if self.wrap_width == 0 {
            return Err(ConfigError::new("wrap_width must be at least 1"));
        }

        Ok(IndexSettings {
            decimals: self.precision_steps.ilog10() as usize,
            otu_separator: self.otu_separator.clone(),
            element_separator: self.element_separator.clone(),
            wrap_width: self.wrap_width,
        })
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    decimals: usize,
    otu_separator: String,
    element_separator: String,
    wrap_width: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_PRECISION_STEPS.ilog10() as usize,
            otu_separator: DEFAULT_OTU_SEPARATOR.to_string(),
            element_separator: DEFAULT_ELEMENT_SEPARATOR.to_string(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl IndexSettings {
    /// Settings for a given precision with default separators.
    pub fn with_precision(precision_steps: u32) -> Result<Self, ConfigError> {
        IndexConfig {
            precision_steps,
            ..IndexConfig::default()
        }
        .validate()
    }

    /// Number of decimal places, `floor(log10(precision_steps))`.
    pub fn decimals(&self) -> usize {
        self.decimals
    }

    pub fn otu_separator(&self) -> &str {
        &self.otu_separator
    }

    pub fn element_separator(&self) -> &str {
        &self.element_separator
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Format a caller-supplied threshold into the key form used for lookups.
    ///
    /// Values are printed with exactly `decimals` places. Keys read from the
    /// file are stored unrounded, so a query only hits a file key whose text
    /// already has this form (`0.03` matches at two decimals, `0.0` does not).
    /// That mismatch is kept as observed behavior.
    pub fn format_threshold(&self, threshold: Threshold) -> String {
        match threshold {
            Threshold::Unique => UNIQUE_THRESHOLD.to_string(),
            Threshold::Value(value) => format!("{:.*}", self.decimals, value),
        }
    }

    /// Round a value to `decimals` places.
    ///
    /// Goes through the decimal text so the result is the float nearest to
    /// the correctly rounded decimal, not an artifact of scaling.
    pub fn round(&self, value: f64) -> f64 {
        format!("{:.*}", self.decimals, value)
            .parse()
            .unwrap_or(value)
    }
}

/// Overrides that take precedence over file and env config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otu_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_width: Option<usize>,
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}
