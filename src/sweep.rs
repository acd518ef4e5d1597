//! Sweep data model
//!
//! A [`Sweep`] is one full current-vs-voltage measurement run: four
//! index-aligned arrays of per-point means and standard deviations. A
//! [`SweepSeries`] is an ordered sequence of sweeps, typically repeated
//! measurements over time or irradiation dose; the order is the time axis
//! for the threshold-vs-time charts.

use crate::estimate::EstimateError;

/// One current-vs-voltage measurement run.
///
/// All four arrays are aligned by sample index: the voltage and current at
/// index `i` were measured simultaneously. Voltages are assumed (not
/// enforced) to be monotonically increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    /// Drain current means, in document order.
    pub currents: Vec<f64>,
    /// Per-point standard deviation of each current sample.
    pub current_std: Vec<f64>,
    /// Gate voltage means, in document order.
    pub voltages: Vec<f64>,
    /// Per-point standard deviation of each voltage sample.
    pub voltage_std: Vec<f64>,
}

/// An ordered sequence of sweeps from one measurement document.
pub type SweepSeries = Vec<Sweep>;

impl Sweep {
    /// Number of samples in the sweep (length of the current arrays).
    pub fn len(&self) -> usize {
        self.currents.len()
    }

    /// Whether the sweep holds no samples at all.
    pub fn is_empty(&self) -> bool {
        self.currents.is_empty()
    }

    /// Check that all four arrays agree in length.
    ///
    /// The loader passes mismatched sweeps through as-is; this check runs at
    /// the sweep boundary so a ragged record surfaces as a named, recoverable
    /// error instead of an out-of-range index deep inside the derivative
    /// pipeline.
    pub fn validate(&self) -> Result<(), EstimateError> {
        let n = self.currents.len();
        if self.current_std.len() != n
            || self.voltages.len() != n
            || self.voltage_std.len() != n
        {
            return Err(EstimateError::DimensionMismatch {
                currents: self.currents.len(),
                voltages: self.voltages.len(),
            });
        }
        Ok(())
    }
}
