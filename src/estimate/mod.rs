//! Threshold-voltage estimation strategies
//!
//! Two independent estimators run against each sweep:
//!
//! - [`steepest_slope`]: linear extrapolation from the point of maximum
//!   positive slope on the Id/Vg curve down to the voltage axis, with full
//!   first-order error propagation.
//! - [`second_derivative_peak`]: the voltage at which the discrete second
//!   derivative of current with respect to voltage is maximal, with a
//!   sample-spacing resolution bound as the uncertainty.
//!
//! Both take one [`Sweep`] and return a transient result owned by the
//! caller; nothing is cached between passes.

use crate::numeric::{second_derivative, trimmed_window};
use crate::sweep::Sweep;

pub use error::EstimateError;

mod error;

/// A scalar threshold-voltage estimate with its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEstimate {
    /// Estimated threshold voltage.
    pub volts: f64,
    /// Symmetric uncertainty bound on the estimate.
    pub error: f64,
}

/// The tangent line fitted through the steepest point of a sweep.
///
/// Kept alongside the estimate so the plotter can render the line across
/// the full voltage range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentLine {
    /// Slope of the line (the winning gradient).
    pub gradient: f64,
    /// Voltage of the anchor sample the line passes through.
    pub anchor_voltage: f64,
    /// Current of the anchor sample the line passes through.
    pub anchor_current: f64,
}

impl TangentLine {
    /// Evaluate the line at voltage `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.gradient * (x - self.anchor_voltage) + self.anchor_current
    }
}

/// Full result of the steepest-slope strategy for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteepestSlopeFit {
    /// The x-intercept estimate and its propagated uncertainty.
    pub estimate: ThresholdEstimate,
    /// The fitted tangent line, for rendering.
    pub tangent: TangentLine,
    /// Sample index of the steepest pair's left sample.
    pub index: usize,
    /// Propagated uncertainty of the winning gradient.
    pub gradient_err: f64,
}

/// Estimate the threshold voltage by steepest-tangent extrapolation.
///
/// Scans consecutive sample pairs for the maximum gradient
/// `(I[i+1] - I[i]) / (V[i+1] - V[i])`, considering only candidates with
/// `I[i] > 0` (samples at or below zero current are noise-dominated, typically
/// below threshold). The tangent line through the winning sample is
/// extrapolated to the voltage axis; its intercept is the estimate.
///
/// Error propagation is first-order relative-error quadrature: the gradient
/// uncertainty combines the current and both voltage uncertainties at the
/// winning pair, and the intercept uncertainty combines the propagated
/// `I/gradient` term with the anchor-point voltage uncertainty.
pub fn steepest_slope(sweep: &Sweep) -> Result<SteepestSlopeFit, EstimateError> {
    sweep.validate()?;

    let currents = &sweep.currents;
    let voltages = &sweep.voltages;
    let n = currents.len();

    let mut best: Option<(usize, f64)> = None;
    for i in 0..n.saturating_sub(1) {
        let gradient = (currents[i + 1] - currents[i]) / (voltages[i + 1] - voltages[i]);
        if currents[i] > 0.0 && gradient > best.map_or(0.0, |(_, g)| g) {
            best = Some((i, gradient));
        }
    }
    let (idx, gradient) = best.ok_or(EstimateError::NoValidSlope)?;

    let rel_current = sweep.current_std[idx] / currents[idx];
    let rel_voltage_hi = sweep.voltage_std[idx + 1] / voltages[idx + 1];
    let rel_voltage_lo = sweep.voltage_std[idx] / voltages[idx];
    let gradient_err = gradient
        * (rel_current.powi(2) + rel_voltage_hi.powi(2) + rel_voltage_lo.powi(2)).sqrt();

    // x-intercept of the tangent line through the winning sample.
    let drop = currents[idx] / gradient;
    let volts = voltages[idx] - drop;
    let rel_drop = (rel_current.powi(2) + (gradient_err / gradient).powi(2)).sqrt();
    let error = ((drop * rel_drop).powi(2) + sweep.voltage_std[idx].powi(2)).sqrt();

    Ok(SteepestSlopeFit {
        estimate: ThresholdEstimate { volts, error },
        tangent: TangentLine {
            gradient,
            anchor_voltage: voltages[idx],
            anchor_current: currents[idx],
        },
        index: idx,
        gradient_err,
    })
}

/// Estimate the threshold voltage from the second-derivative maximum.
///
/// Computes the discrete second derivative of current with respect to
/// voltage, finds its maximum, and maps the winning index through the
/// trimmed voltage window. The uncertainty is resolution-based, not
/// statistical: the larger of the distances to the two neighboring voltage
/// samples.
pub fn second_derivative_peak(sweep: &Sweep) -> Result<ThresholdEstimate, EstimateError> {
    sweep.validate()?;

    let d2 = second_derivative(&sweep.voltages, &sweep.currents);
    let window = trimmed_window(&sweep.voltages);

    let mut best: Option<(usize, f64)> = None;
    for (i, value) in d2.iter().enumerate() {
        if value.is_finite() && best.map_or(true, |(_, b)| *value > b) {
            best = Some((i, *value));
        }
    }
    let (idx, _) = best.ok_or(EstimateError::PeakAtBoundary)?;
    // Both neighbors are required for the resolution bound.
    if idx == 0 || idx + 1 >= window.len() {
        return Err(EstimateError::PeakAtBoundary);
    }

    let volts = window[idx];
    let error = (window[idx + 1] - volts).max(volts - window[idx - 1]);
    Ok(ThresholdEstimate { volts, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(currents: Vec<f64>, voltages: Vec<f64>) -> Sweep {
        let n = currents.len();
        let m = voltages.len();
        Sweep {
            currents,
            current_std: vec![1.0e-10; n],
            voltages,
            voltage_std: vec![0.001; m],
        }
    }

    #[test]
    fn test_steepest_slope_known_segment() {
        // Single maximal-gradient segment: the line through (3.0, 1.0) with
        // slope 1 intercepts the voltage axis at exactly 2.0.
        let s = sweep(
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0],
            (0..8).map(|i| i as f64).collect(),
        );
        let fit = steepest_slope(&s).unwrap();
        assert_eq!(fit.index, 3);
        assert!((fit.tangent.gradient - 1.0).abs() < 1e-9);
        assert!((fit.estimate.volts - 2.0).abs() < 1e-9);
        assert!(fit.estimate.error.is_finite());
    }

    #[test]
    fn test_steepest_slope_measurement_scenario() {
        let s = sweep(
            vec![1.0e-9, 1.0e-9, 1.0e-9, 5.0e-6, 4.9e-5, 1.0e-4, 1.05e-4],
            vec![1.4, 1.6, 1.8, 2.0, 2.2, 2.4, 2.6],
        );
        let fit = steepest_slope(&s).unwrap();
        // Maximum eligible gradient is the 2.2 -> 2.4 segment.
        assert_eq!(fit.index, 4);
        assert!(fit.estimate.volts > 1.8 && fit.estimate.volts < 2.2);
        assert!(fit.estimate.error > 0.0);
    }

    #[test]
    fn test_steepest_slope_rejects_nonpositive_current() {
        // The steepest segment starts at zero current, so it is ineligible
        // and the later, shallower segment wins.
        let s = sweep(
            vec![0.0, 10.0, 11.0, 12.0],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        let fit = steepest_slope(&s).unwrap();
        assert_eq!(fit.index, 1);
    }

    #[test]
    fn test_no_valid_slope_on_flat_sweep() {
        let s = sweep(vec![1.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]);
        assert_eq!(steepest_slope(&s).unwrap_err(), EstimateError::NoValidSlope);
    }

    #[test]
    fn test_no_valid_slope_on_nonpositive_currents() {
        let s = sweep(vec![-1.0, 0.0, -0.5, 0.0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(steepest_slope(&s).unwrap_err(), EstimateError::NoValidSlope);
    }

    #[test]
    fn test_dimension_mismatch_detected() {
        let mut s = sweep(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]);
        s.voltages.pop();
        s.voltage_std.pop();
        assert!(matches!(
            steepest_slope(&s).unwrap_err(),
            EstimateError::DimensionMismatch { .. }
        ));
        assert!(matches!(
            second_derivative_peak(&s).unwrap_err(),
            EstimateError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn test_second_derivative_peak_at_knee() {
        // Flat then linear: the curvature peaks exactly at the knee sample.
        let voltages: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let currents: Vec<f64> = voltages.iter().map(|v| (v - 3.0).max(0.0)).collect();
        let s = sweep(currents, voltages);
        let peak = second_derivative_peak(&s).unwrap();
        assert!((peak.volts - 3.0).abs() < 1.0 + 1e-9);
        assert!((peak.error - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_second_derivative_peak_boundary() {
        // Exponential growth: curvature is maximal at the last window sample.
        let voltages: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let currents: Vec<f64> = voltages.iter().map(|v| v.exp()).collect();
        let s = sweep(currents, voltages);
        assert_eq!(
            second_derivative_peak(&s).unwrap_err(),
            EstimateError::PeakAtBoundary
        );
    }

    #[test]
    fn test_second_derivative_peak_too_short() {
        let s = sweep(vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            second_derivative_peak(&s).unwrap_err(),
            EstimateError::PeakAtBoundary
        );
    }

    #[test]
    fn test_tangent_line_eval() {
        let line = TangentLine {
            gradient: 2.0,
            anchor_voltage: 1.0,
            anchor_current: 3.0,
        };
        assert!((line.eval(1.0) - 3.0).abs() < 1e-12);
        assert!((line.eval(0.0) - 1.0).abs() < 1e-12);
        // The x-intercept recovers anchor_voltage - anchor_current/gradient.
        assert!(line.eval(1.0 - 3.0 / 2.0).abs() < 1e-12);
    }
}
