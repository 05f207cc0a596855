//! Tool configuration
//!
//! Loaded from, lowest priority first:
//! - built-in defaults
//! - `./dripcu.toml` or the file passed with `--config`
//! - `DRIPCU_LOCALE`
//! - command-line flags (applied by the caller)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::input::GridOrder;
use crate::report::ReportFormat;

pub const DEFAULT_CONFIG_FILE: &str = "dripcu.toml";

/// Language used for labels, prompts and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Locale::Es),
            "en" | "english" => Ok(Locale::En),
            _ => Err(anyhow!("Unknown locale '{}'. Valid locales: es, en", s)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => write!(f, "es"),
            Locale::En => write!(f, "en"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub locale: Locale,
    pub report: ReportConfig,
    pub display: DisplayConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Measurements per line in the report listing
    pub group_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            format: ReportFormat::Text,
            group_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub chart: bool,
    pub table: bool,
    /// Width in characters of the longest bar
    pub chart_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            chart: false,
            table: false,
            chart_width: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GridConfig {
    pub emitters: usize,
    pub columns: usize,
    pub order: GridOrder,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            emitters: 16,
            columns: 4,
            order: GridOrder::Rows,
        }
    }
}

impl Config {
    /// Load the config file (explicit path, or `./dripcu.toml` if present)
    /// and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Ok(locale) = std::env::var("DRIPCU_LOCALE") {
            config.apply_locale_env(&locale)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Overrides the locale with the value of `DRIPCU_LOCALE`.
    pub fn apply_locale_env(&mut self, value: &str) -> Result<()> {
        self.locale = value
            .parse()
            .context("invalid DRIPCU_LOCALE environment variable")?;
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.group_size == 0 {
            return Err(anyhow!("report.group_size must be at least 1"));
        }
        if self.grid.columns == 0 {
            return Err(anyhow!("grid.columns must be at least 1"));
        }
        if self.display.chart_width == 0 {
            return Err(anyhow!("display.chart_width must be at least 1"));
        }
        Ok(())
    }
}
