//! Last-result holder for an interactive run.

use crate::error::InvalidInputError;
use crate::input::MeasurementSet;
use crate::uniformity::{UniformityCalculator, UniformityResult};

/// A sample together with the result computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub measurements: MeasurementSet,
    pub result: UniformityResult,
}

/// Owns the most recent successful computation. Only [`Session::recompute`]
/// and [`Session::clear`] change it.
#[derive(Debug, Default)]
pub struct Session {
    last: Option<Computation>,
    runs: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes CU for `measurements` and keeps it as the last result.
    ///
    /// On error the previous computation is left in place.
    pub fn recompute(
        &mut self,
        measurements: MeasurementSet,
    ) -> Result<&Computation, InvalidInputError> {
        let result = UniformityCalculator::compute(measurements.as_slice())?;
        self.runs += 1;
        tracing::debug!(run = self.runs, cu = result.cu, "session updated");
        Ok(&*self.last.insert(Computation {
            measurements,
            result,
        }))
    }

    pub fn last(&self) -> Option<&Computation> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Number of successful computations so far.
    pub fn runs(&self) -> usize {
        self.runs
    }
}
