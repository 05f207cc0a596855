use thiserror::Error;

/// Why a measurement sample cannot produce a uniformity coefficient.
///
/// Positions are 1-based so they match the emitter numbering users see.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("no flow-rate measurements were supplied")]
    Empty,

    #[error("measurement #{index} is not a finite number ({value})")]
    NonFinite { index: usize, value: f64 },

    #[error("measurement #{index} is negative ({value} ml)")]
    Negative { index: usize, value: f64 },

    #[error("overall mean flow is zero, the uniformity coefficient is undefined")]
    ZeroMean,
}

/// Malformed free-text or field input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("value #{position} ('{token}') is not a number")]
    InvalidToken { position: usize, token: String },

    #[error("value #{position} ('{token}') is not a finite number")]
    NonFinite { position: usize, token: String },

    #[error("value #{position} is negative ({value} ml)")]
    Negative { position: usize, value: f64 },
}
