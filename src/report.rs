//! Printable uniformity reports
//!
//! Supports three output formats:
//! - `text` - Plain text, one fact per line, ready to print
//! - `markdown` - The same content as a Markdown document
//! - `json` - Machine-readable JSON

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::path::Path;
use std::str::FromStr;

use crate::config::Locale;
use crate::input::MeasurementSet;
use crate::uniformity::UniformityResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, markdown, json",
                s
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything a report shows: the result plus the measurements, ascending.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub result: UniformityResult,
    pub measurements: Vec<f64>,
    pub locale: Locale,
    #[serde(skip)]
    pub group_size: usize,
}

struct Labels {
    title: &'static str,
    count: &'static str,
    mean: &'static str,
    low_quartile: &'static str,
    cu: &'static str,
    interpretation: &'static str,
    listing: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::Es => Labels {
            title: "Informe de Cálculo del Coeficiente de Uniformidad (CU)",
            count: "Número de goteros analizados",
            mean: "Media total",
            low_quartile: "Media del 25% más bajo",
            cu: "CU (Coeficiente de Uniformidad)",
            interpretation: "Interpretación",
            listing: "Caudales analizados (ml)",
        },
        Locale::En => Labels {
            title: "Uniformity Coefficient (CU) Report",
            count: "Emitters analyzed",
            mean: "Overall mean",
            low_quartile: "Lowest 25% mean",
            cu: "CU (Uniformity Coefficient)",
            interpretation: "Interpretation",
            listing: "Measured flow rates (ml)",
        },
    }
}

impl Report {
    pub fn new(result: &UniformityResult, measurements: &MeasurementSet, locale: Locale) -> Self {
        Report {
            result: result.clone(),
            measurements: measurements.sorted(),
            locale,
            group_size: 5,
        }
    }

    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = group_size.max(1);
        self
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Markdown => Ok(self.render_markdown()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Measurement listing, `group_size` values per line at one decimal.
    fn measurement_lines(&self) -> Vec<String> {
        self.measurements
            .chunks(self.group_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|v| format!("{:.1}", v))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect()
    }

    fn render_text(&self) -> String {
        let l = labels(self.locale);
        let r = &self.result;
        let mut out = String::new();

        let _ = writeln!(out, "{}", l.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}: {}", l.count, r.sample_count);
        let _ = writeln!(out, "{}: {:.2} ml", l.mean, r.overall_mean);
        let _ = writeln!(out, "{}: {:.2} ml", l.low_quartile, r.low_quartile_mean);
        let _ = writeln!(out, "{}: {:.2} %", l.cu, r.cu);
        let _ = writeln!(out, "{}: {}", l.interpretation, r.category.label(self.locale));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", l.listing);
        for line in self.measurement_lines() {
            let _ = writeln!(out, "{}", line);
        }
        out
    }

    fn render_markdown(&self) -> String {
        let l = labels(self.locale);
        let r = &self.result;
        let mut out = String::new();

        let _ = writeln!(out, "# {}", l.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "| | |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| {} | {} |", l.count, r.sample_count);
        let _ = writeln!(out, "| {} | {:.2} ml |", l.mean, r.overall_mean);
        let _ = writeln!(out, "| {} | {:.2} ml |", l.low_quartile, r.low_quartile_mean);
        let _ = writeln!(out, "| {} | **{:.2} %** |", l.cu, r.cu);
        let _ = writeln!(out, "| {} | {} |", l.interpretation, r.category.label(self.locale));
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", l.listing);
        let _ = writeln!(out);
        let _ = writeln!(out, "```");
        for line in self.measurement_lines() {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, "```");
        out
    }

    /// Renders and writes the report to `path`.
    pub fn export(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = self.render(format)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), %format, "report exported");
        Ok(())
    }
}

pub fn default_file_name(locale: Locale, format: ReportFormat) -> String {
    let stem = match locale {
        Locale::Es => "informe_CU_riego_goteo",
        Locale::En => "drip_uniformity_report",
    };
    format!("{}.{}", stem, format.file_extension())
}
