//! Central-difference derivative engine
//!
//! Discrete first and second derivatives of a sampled curve, with the
//! index-alignment bookkeeping the second pass requires, plus an optional
//! smoothing stage that can be applied to the samples before
//! differentiation.
//!
//! Each differentiation pass drops one sample at either end, so the first
//! derivative has length `len - 2` and the second `len - 4`. Index `i` of
//! the second-derivative sequence corresponds to original sample index
//! `i + SECOND_DERIVATIVE_TRIM`; [`trimmed_window`] yields the matching
//! x-axis slice.

/// Samples trimmed from each end of the x-axis by the double
/// central-difference pass.
pub const SECOND_DERIVATIVE_TRIM: usize = 2;

/// Central-difference first derivative of `y` with respect to `x`.
///
/// For each interior index `1 <= i <= len - 2` this computes
/// `(y[i+1] - y[i-1]) / (x[i+1] - x[i-1])`, a second-order-accurate estimate
/// of dy/dx at `x[i]`. The output has length `len - 2`; inputs shorter than
/// three samples yield an empty sequence.
pub fn first_derivative(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    if n < 3 {
        return Vec::new();
    }
    let mut derivative = Vec::with_capacity(n - 2);
    for i in 1..n - 1 {
        derivative.push((y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1]));
    }
    derivative
}

/// Discrete second derivative: [`first_derivative`] applied twice.
///
/// The second pass runs over `(x[1..len-1], d1)`, so the output has length
/// `len - 4` and its index `i` corresponds to original sample index
/// `i + SECOND_DERIVATIVE_TRIM`.
pub fn second_derivative(x: &[f64], y: &[f64]) -> Vec<f64> {
    let d1 = first_derivative(x, y);
    let n = x.len();
    if n < 3 {
        return Vec::new();
    }
    first_derivative(&x[1..n - 1], &d1)
}

/// The x-axis window matching a second-derivative sequence.
///
/// Trims [`SECOND_DERIVATIVE_TRIM`] samples from each end so the window is
/// centered on the original one; `trimmed_window(x)[i]` is the abscissa of
/// `second_derivative(x, y)[i]`.
pub fn trimmed_window(x: &[f64]) -> &[f64] {
    if x.len() < 2 * SECOND_DERIVATIVE_TRIM {
        return &[];
    }
    &x[SECOND_DERIVATIVE_TRIM..x.len() - SECOND_DERIVATIVE_TRIM]
}

/// Optional preprocessing applied to the sample values before
/// differentiation.
///
/// The estimators run on the raw samples ([`Smoothing::Identity`]); the
/// moving-average variant is available for noisy data but is not wired into
/// the main analysis path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// No preprocessing; samples pass through unchanged.
    #[default]
    Identity,
    /// Centered moving average over `2 * radius + 1` samples, truncated at
    /// the sequence ends. Radius zero is the identity.
    MovingAverage {
        /// Half-width of the averaging window, in samples.
        radius: usize,
    },
}

impl Smoothing {
    /// Apply the smoothing strategy to a sample sequence.
    pub fn apply(&self, y: &[f64]) -> Vec<f64> {
        match *self {
            Smoothing::Identity | Smoothing::MovingAverage { radius: 0 } => y.to_vec(),
            Smoothing::MovingAverage { radius } => {
                let n = y.len();
                let mut smoothed = Vec::with_capacity(n);
                for i in 0..n {
                    let lo = i.saturating_sub(radius);
                    let hi = (i + radius + 1).min(n);
                    let window = &y[lo..hi];
                    smoothed.push(window.iter().sum::<f64>() / window.len() as f64);
                }
                smoothed
            }
        }
    }
}
