//! Collecting emitter flow rates from the user.
//!
//! Two ways in: a block of free text (`3.5, 3.6 3.8\n3.2`) or one field per
//! emitter laid out on a numbered grid. Both produce a [`MeasurementSet`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use colored::*;

use crate::config::Locale;
use crate::error::ParseError;

/// Flow rates in milliliters, in the order they were entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementSet(Vec<f64>);

impl MeasurementSet {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    /// Ascending copy of the values.
    pub fn sorted(&self) -> Vec<f64> {
        crate::stats::sorted(&self.0)
    }
}

impl From<Vec<f64>> for MeasurementSet {
    fn from(values: Vec<f64>) -> Self {
        MeasurementSet(values)
    }
}

/// Parses free text where values are separated by commas or whitespace.
///
/// Blank text gives an empty set.
pub fn parse_free_text(text: &str) -> Result<MeasurementSet, ParseError> {
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let mut values = Vec::new();
    for (i, token) in tokens.enumerate() {
        values.push(parse_value(token, i + 1)?);
    }

    tracing::debug!(count = values.len(), "parsed free-text measurements");
    Ok(MeasurementSet(values))
}

fn parse_value(token: &str, position: usize) -> Result<f64, ParseError> {
    let value: f64 = token.parse().map_err(|_| ParseError::InvalidToken {
        position,
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite {
            position,
            token: token.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ParseError::Negative { position, value });
    }
    Ok(value)
}

/// One value per emitter; unset fields read as 0.0.
pub fn from_fields(fields: &[Option<f64>]) -> MeasurementSet {
    MeasurementSet(fields.iter().map(|f| f.unwrap_or(0.0)).collect())
}

/// Direction in which emitter numbers run across the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridOrder {
    #[default]
    Rows,
    Columns,
}

impl FromStr for GridOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rows" | "row" => Ok(GridOrder::Rows),
            "columns" | "column" | "cols" => Ok(GridOrder::Columns),
            _ => Err(anyhow!("Unknown grid order '{}'. Valid orders: rows, columns", s)),
        }
    }
}

impl fmt::Display for GridOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridOrder::Rows => write!(f, "rows"),
            GridOrder::Columns => write!(f, "columns"),
        }
    }
}

/// Numbered field grid, one field per emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub emitters: usize,
    pub columns: usize,
    pub order: GridOrder,
    pub locale: Locale,
}

impl GridLayout {
    pub fn new(emitters: usize, columns: usize, order: GridOrder, locale: Locale) -> Self {
        GridLayout {
            emitters,
            columns: columns.max(1),
            order,
            locale,
        }
    }

    pub fn rows(&self) -> usize {
        self.emitters.div_ceil(self.columns)
    }

    /// Zero-based (row, column) of emitter `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        match self.order {
            GridOrder::Rows => (index / self.columns, index % self.columns),
            GridOrder::Columns => {
                let rows = self.rows().max(1);
                (index % rows, index / rows)
            }
        }
    }

    fn prompt(&self, index: usize) -> String {
        let (row, col) = self.position(index);
        match self.locale {
            Locale::Es => format!("Gotero {} [fila {}, col {}]: ", index + 1, row + 1, col + 1),
            Locale::En => format!("Emitter {} [row {}, col {}]: ", index + 1, row + 1, col + 1),
        }
    }

    /// Prompts for every emitter on `output` and reads answers from `input`.
    ///
    /// A blank answer leaves the field unset. A bad answer is reported and
    /// asked again. Once `input` runs dry the remaining fields stay unset.
    pub fn collect<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<MeasurementSet> {
        let mut fields: Vec<Option<f64>> = vec![None; self.emitters];
        let mut line = String::new();

        'fields: for (index, field) in fields.iter_mut().enumerate() {
            loop {
                write!(output, "{}", self.prompt(index))?;
                output.flush()?;

                line.clear();
                if input.read_line(&mut line)? == 0 {
                    writeln!(output)?;
                    tracing::debug!(filled = index, "input closed before the grid was complete");
                    break 'fields;
                }

                let answer = line.trim();
                if answer.is_empty() {
                    break;
                }
                match parse_value(answer, index + 1) {
                    Ok(value) => {
                        *field = Some(value);
                        break;
                    }
                    Err(err) => writeln!(output, "{} {}", "error:".red().bold(), err)?,
                }
            }
        }

        Ok(from_fields(&fields))
    }
}
