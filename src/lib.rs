//! # dripcu
//!
//! Uniformity coefficient (CU) for drip-irrigation systems.
//!
//! Flow rates collected from each emitter go through
//! [`uniformity::UniformityCalculator`], which compares the mean of the
//! lowest quarter against the overall mean and grades the result. The other
//! modules gather the measurements, show the result on a terminal and write
//! printable reports.

pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod report;
pub mod session;
pub mod stats;
pub mod uniformity;

pub use error::{InvalidInputError, ParseError};
pub use input::MeasurementSet;
pub use uniformity::{Category, UniformityCalculator, UniformityResult};
