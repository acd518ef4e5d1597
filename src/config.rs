//! Analysis and graph selection surface
//!
//! The recognized toggles mirror the five analysis/plot switches: the
//! instantaneous group (`iv_graph`, `steepest_line`, `derivative`) renders
//! one chart per input file with the raw curves, tangent lines, and scaled
//! second derivatives; the time-series group (`dvt_over_time`,
//! `lvt_over_time`) plots threshold estimates against sweep index. The two
//! groups share axes that do not compose, so selecting across groups is a
//! configuration error caught before any work begins.
//!
//! Toggles may also come from a TOML file:
//!
//! ```toml
//! # vthresh.toml
//! [analysis]
//! iv_graph = true
//! steepest_line = true
//! derivative = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Errors in the analysis selection, all fatal before any loading.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An instantaneous graph and a time-series graph were both selected.
    #[error("incompatible graph selection: IV/steepest/derivative graphs cannot be combined with threshold-vs-time graphs")]
    IncompatibleGraphSelection,

    /// Every toggle resolved to off.
    #[error("no graphs selected")]
    NothingSelected,
}

/// Immutable analysis selection passed into the pipeline at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Render the raw error-bar IV curves.
    pub iv_graph: bool,
    /// Run the steepest-slope estimator and render its tangent lines.
    pub steepest_line: bool,
    /// Run the second-derivative estimator and render its scaled curves.
    pub derivative: bool,
    /// Plot second-derivative threshold estimates against sweep index.
    pub dvt_over_time: bool,
    /// Plot steepest-slope threshold estimates against sweep index.
    pub lvt_over_time: bool,
}

impl Default for AnalysisConfig {
    /// The instantaneous group in full, no time-series graphs.
    fn default() -> Self {
        Self {
            iv_graph: true,
            steepest_line: true,
            derivative: true,
            dvt_over_time: false,
            lvt_over_time: false,
        }
    }
}

impl AnalysisConfig {
    /// Whether any graph from the instantaneous group is selected.
    pub fn instantaneous(&self) -> bool {
        self.iv_graph || self.steepest_line || self.derivative
    }

    /// Whether any graph from the time-series group is selected.
    pub fn time_series(&self) -> bool {
        self.dvt_over_time || self.lvt_over_time
    }

    /// Whether the steepest-slope estimator must run.
    pub fn needs_steepest(&self) -> bool {
        self.steepest_line || self.lvt_over_time
    }

    /// Whether the second-derivative estimator must run.
    pub fn needs_peak(&self) -> bool {
        self.derivative || self.dvt_over_time
    }

    /// Validate the selection once, before any loading or file I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instantaneous() && self.time_series() {
            return Err(ConfigError::IncompatibleGraphSelection);
        }
        if !self.instantaneous() && !self.time_series() {
            return Err(ConfigError::NothingSelected);
        }
        Ok(())
    }

    /// Suffix appended to the output image name for the selected mode.
    pub fn mode_suffix(&self) -> &'static str {
        if self.time_series() {
            "VtT"
        } else {
            "iv"
        }
    }

    /// Resolve the effective selection from file-supplied defaults and CLI
    /// switches.
    ///
    /// CLI switches only turn graphs on; file entries may set either state.
    /// When neither source mentions any toggle the default selection (the
    /// full instantaneous group) applies.
    pub fn resolve(file: &AnalysisToggles, cli: &AnalysisConfigFlags) -> Self {
        let file_any = file.iv_graph.is_some()
            || file.steepest_line.is_some()
            || file.derivative.is_some()
            || file.dvt_over_time.is_some()
            || file.lvt_over_time.is_some();
        let cli_any = cli.iv_graph
            || cli.steepest_line
            || cli.derivative
            || cli.dvt_over_time
            || cli.lvt_over_time;
        if !file_any && !cli_any {
            return Self::default();
        }

        Self {
            iv_graph: cli.iv_graph || file.iv_graph.unwrap_or(false),
            steepest_line: cli.steepest_line || file.steepest_line.unwrap_or(false),
            derivative: cli.derivative || file.derivative.unwrap_or(false),
            dvt_over_time: cli.dvt_over_time || file.dvt_over_time.unwrap_or(false),
            lvt_over_time: cli.lvt_over_time || file.lvt_over_time.unwrap_or(false),
        }
    }
}

/// The five toggles as plain CLI booleans (presence turns a graph on).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisConfigFlags {
    /// `--iv-graph` was given.
    pub iv_graph: bool,
    /// `--steepest-line` was given.
    pub steepest_line: bool,
    /// `--derivative` was given.
    pub derivative: bool,
    /// `--dvt-over-time` was given.
    pub dvt_over_time: bool,
    /// `--lvt-over-time` was given.
    pub lvt_over_time: bool,
}

/// Root configuration structure for vthresh.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Analysis selection defaults.
    #[serde(default)]
    pub analysis: AnalysisToggles,
}

/// Optional per-toggle entries of the `[analysis]` table.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisToggles {
    /// Render the raw error-bar IV curves.
    pub iv_graph: Option<bool>,
    /// Run the steepest-slope estimator and render its tangent lines.
    pub steepest_line: Option<bool>,
    /// Run the second-derivative estimator and render its scaled curves.
    pub derivative: Option<bool>,
    /// Plot second-derivative threshold estimates against sweep index.
    pub dvt_over_time: Option<bool>,
    /// Plot steepest-slope threshold estimates against sweep index.
    pub lvt_over_time: Option<bool>,
}

impl ConfigFile {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
