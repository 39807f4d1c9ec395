//! Configuration file support for the docblock CLI
//!
//! Loads settings from a `_docblock.toml` configuration file.

use anyhow::{Context, Result};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_docblock.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str = "https://raw.githubusercontent.com/docblock-rs/docblock/main/crates/docblock-cli/schema/docblock.schema.json";

/// How parsed docblocks are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `key: value` line per field
    Text,
    /// The parsed docblock as JSON
    Json,
}

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Validation configuration
    #[serde(skip_serializing_if = "CheckConfig::is_empty")]
    pub check: CheckConfig,
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json" (default: "text")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Pretty-print JSON output (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.format.is_none() && self.pretty.is_none()
    }
}

/// Validation configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct CheckConfig {
    /// Require every @param tag to read `<type> $<name> [description]` (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_params: Option<bool>,
}

impl CheckConfig {
    fn is_empty(&self) -> bool {
        self.strict_params.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_docblock.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                format: Some(OutputFormat::Text),
                pretty: Some(true),
            },
            check: CheckConfig {
                strict_params: Some(false),
            },
        }
    }
}
