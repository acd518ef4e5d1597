/// Per-sweep estimation failures
///
/// These are reportable, not fatal: the pipeline catches them at the sweep
/// boundary, logs a warning, and continues with the remaining sweeps.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EstimateError {
    /// No sample pair had a positive gradient with positive current; the
    /// steepest-slope scan never left its sentinel.
    #[error("no ascending segment with positive current")]
    NoValidSlope,

    /// The second-derivative maximum lies at the edge of the trimmed window,
    /// leaving no neighbor for the resolution error bound.
    #[error("second-derivative peak lies at the window boundary")]
    PeakAtBoundary,

    /// The sweep's arrays differ in length; index-aligned access would be
    /// meaningless.
    #[error("mismatched sweep arrays ({currents} current samples, {voltages} voltage samples)")]
    DimensionMismatch {
        /// Number of current samples in the sweep.
        currents: usize,
        /// Number of voltage samples in the sweep.
        voltages: usize,
    },
}
