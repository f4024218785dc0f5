//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.scorelens.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "score_report.md".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// The fixed ordered list of majors the per-major averages are
    /// computed over. Order is preserved in the report output.
    #[serde(default = "default_majors")]
    pub majors: Vec<String>,

    /// Number of recent students shown in the overview section.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            majors: default_majors(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_majors() -> Vec<String> {
    vec!["数据科学", "计算机科学", "软件工程", "人工智能", "网络安全"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_recent_limit() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".scorelens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref majors) = args.majors {
            self.report.majors = majors.clone();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check that the merged configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.report.majors.is_empty() {
            bail!("The major list must not be empty");
        }
        if self.report.majors.iter().any(|m| m.trim().is_empty()) {
            bail!("Major names must not be blank");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
