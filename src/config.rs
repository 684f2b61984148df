//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.hawkai.toml` files.

use crate::analysis::ViewOptions;
use crate::models::ModuleDef;
use crate::seed;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".hawkai.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report rendering settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Module buckets for the module rollup.
    #[serde(default = "seed::default_modules")]
    pub modules: Vec<ModuleDef>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            report: ReportConfig::default(),
            modules: seed::default_modules(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Write rendered output to this file instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Output format for rendered views and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Width of a full rollup bar, in characters.
    #[serde(default = "default_bar_length")]
    pub bar_length: usize,

    /// Hotspot files in the developer view.
    #[serde(default = "default_developer_hotspots")]
    pub developer_hotspots: usize,

    /// Hotspot files in the tech-lead view.
    #[serde(default = "default_lead_hotspots")]
    pub lead_hotspots: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            bar_length: default_bar_length(),
            developer_hotspots: default_developer_hotspots(),
            lead_hotspots: default_lead_hotspots(),
        }
    }
}

fn default_bar_length() -> usize {
    20
}

fn default_developer_hotspots() -> usize {
    2
}

fn default_lead_hotspots() -> usize {
    3
}

impl ReportConfig {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            developer_hotspots: self.developer_hotspots,
            lead_hotspots: self.lead_hotspots,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject values the renderer cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.report.bar_length == 0 {
            bail!("report.bar_length must be at least 1");
        }
        Ok(())
    }

    /// Log level after merging with CLI arguments.
    ///
    /// `--quiet` wins; otherwise `verbose` from either the file or `-v` gives DEBUG.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.hawkai.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.report.format = format;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if let Some(length) = args.bar_length {
            self.report.bar_length = length;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
