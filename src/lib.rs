//! # vthresh - MOSFET Threshold-Voltage Extraction
//!
//! `vthresh` analyzes current-voltage (IV) measurement sweeps from a MOSFET
//! and extracts the threshold voltage with two independent numerical methods:
//!
//! - **Steepest slope**: find the sample pair with the largest positive
//!   gradient on the Id/Vg curve, fit the tangent line through it, and report
//!   the line's voltage-axis intercept with propagated uncertainty.
//! - **Second-derivative peak**: locate the voltage where the discrete second
//!   derivative of current with respect to voltage is maximal, and report a
//!   sample-spacing resolution bound as the uncertainty.
//!
//! Measurement data is read from an XML document holding one or more sweeps,
//! each a sequence of `Current` and `Voltage` entries carrying a mean and a
//! standard deviation. Results are printed to stdout and rendered to a single
//! PNG chart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vthresh::estimate::{second_derivative_peak, steepest_slope};
//! use vthresh::loader::load_sweeps;
//!
//! let series = load_sweeps("Data/Ba133_uniradiated_linear.xml".as_ref())?;
//! for sweep in &series {
//!     let fit = steepest_slope(sweep)?;
//!     println!("Threshold voltage: {} +/- {}", fit.estimate.volts, fit.estimate.error);
//!     let peak = second_derivative_peak(sweep)?;
//!     println!("Second Derivative Maximum: {} +/- {}", peak.volts, peak.error);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`loader`]: streaming XML parser producing a [`sweep::SweepSeries`]
//! - [`sweep`]: the immutable per-sweep data model
//! - [`numeric`]: central-difference derivative engine and optional smoothing
//! - [`estimate`]: the two threshold estimation strategies
//! - [`plot`]: chart rendering for IV curves and threshold-vs-time series
//! - [`config`]: the analysis/graph selection surface
//!
//! ## Error Policy
//!
//! Malformed input documents and conflicting graph selections are fatal and
//! abort the run before any analysis. Per-sweep estimation failures (no valid
//! ascending segment, a derivative peak at the window boundary, mismatched
//! array lengths) are caught at the sweep boundary: the failing sweep is
//! logged and skipped, and the remaining sweeps continue.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod estimate;
pub mod loader;
pub mod numeric;
pub mod plot;
pub mod sweep;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{AnalysisConfig, ConfigError, ConfigFile};
    pub use crate::estimate::{
        second_derivative_peak, steepest_slope, EstimateError, SteepestSlopeFit, TangentLine,
        ThresholdEstimate,
    };
    pub use crate::loader::{load_sweeps, parse_sweeps, ParseError};
    pub use crate::numeric::{first_derivative, second_derivative, trimmed_window, Smoothing};
    pub use crate::plot::output_path;
    pub use crate::sweep::{Sweep, SweepSeries};
}
