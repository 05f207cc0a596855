//! Terminal readout of a uniformity result: metrics, table and bar chart.

use colored::*;
use std::fmt::Write as _;

use crate::config::Locale;
use crate::input::MeasurementSet;
use crate::uniformity::{Category, UniformityResult};

const BAR: char = '█';

pub fn log_info(label: &str, value: &str) {
    println!("{}", format_info(label, value));
}

fn format_info(label: &str, value: &str) -> String {
    format!("{:>24}: {}", label.bold(), value)
}

fn paint(text: String, category: Category) -> ColoredString {
    match category {
        Category::Excellent | Category::Good => text.green().bold(),
        Category::Acceptable => text.yellow().bold(),
        Category::Deficient | Category::VeryDeficient => text.red().bold(),
    }
}

/// Headline metrics for a result, one aligned line each.
pub fn metric_lines(result: &UniformityResult, locale: Locale) -> Vec<String> {
    let (cu, interpretation, count, mean, low) = match locale {
        Locale::Es => (
            "CU",
            "Interpretación",
            "Goteros analizados",
            "Media total",
            "Media 25% más bajo",
        ),
        Locale::En => (
            "CU",
            "Interpretation",
            "Emitters analyzed",
            "Overall mean",
            "Lowest 25% mean",
        ),
    };

    let mut lines = vec![
        format_info(cu, &paint(format!("{:.2} %", result.cu), result.category).to_string()),
        format_info(interpretation, result.category.label(locale)),
        format_info(count, &result.sample_count.to_string()),
        format_info(mean, &format!("{:.2} ml", result.overall_mean)),
        format_info(low, &format!("{:.2} ml", result.low_quartile_mean)),
        format_info(
            "min / median / max",
            &format!(
                "{:.2} / {:.2} / {:.2} ml (σ {:.2})",
                result.summary.low,
                result.summary.median,
                result.summary.high,
                result.summary.std_dev
            )
            .dimmed()
            .to_string(),
        ),
    ];

    if result.category.needs_attention() {
        let advice = match locale {
            Locale::Es => "Revisar goteros obstruidos y presión del sistema",
            Locale::En => "Check for clogged emitters and system pressure",
        };
        lines.push(format_info("!", &advice.red().to_string()));
    }
    lines
}

pub fn print_metrics(result: &UniformityResult, locale: Locale) {
    for line in metric_lines(result, locale) {
        println!("{}", line);
    }
}

/// Index/flow table in entry order.
pub fn table(measurements: &MeasurementSet, locale: Locale) -> String {
    let header = match locale {
        Locale::Es => ("Gotero", "Caudal (ml)"),
        Locale::En => ("Emitter", "Flow (ml)"),
    };
    let mut out = String::new();
    let _ = writeln!(out, "{:>8}  {:>12}", header.0.bold(), header.1.bold());
    for (i, value) in measurements.iter().enumerate() {
        let _ = writeln!(out, "{:>8}  {:>12.2}", i + 1, value);
    }
    out
}

/// Horizontal bar per emitter, scaled so the largest flow spans `width`.
///
/// Bars at or under `threshold` (the largest value inside the low quartile)
/// are drawn in red.
pub fn bar_chart(measurements: &MeasurementSet, threshold: f64, width: usize) -> String {
    let max = measurements.iter().copied().fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (i, &value) in measurements.iter().enumerate() {
        let len = if max > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR).take(len).collect();
        let bar = if value <= threshold {
            bar.red()
        } else {
            bar.cyan()
        };
        let _ = writeln!(out, "{:>4} {} {:.1}", i + 1, bar, value);
    }
    out
}

/// Largest value that falls inside the low quartile.
pub fn low_quartile_threshold(measurements: &MeasurementSet, result: &UniformityResult) -> f64 {
    let sorted = measurements.sorted();
    sorted
        .get(result.low_quartile_count.saturating_sub(1))
        .copied()
        .unwrap_or(0.0)
}
