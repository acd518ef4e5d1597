//! Integration tests for vthresh
//!
//! These tests verify the full pipeline from measurement-document parsing to
//! threshold estimation and output-path derivation.

use std::fs;

use tempfile::tempdir;
use vthresh::config::{AnalysisConfig, ConfigError};
use vthresh::estimate::{second_derivative_peak, steepest_slope, EstimateError};
use vthresh::loader::load_sweeps;
use vthresh::plot::output_path;

/// The seven-point reference sweep: a MOSFET turning on a little above 2 V.
const CURRENTS: [f64; 7] = [1.0e-9, 1.0e-9, 1.0e-9, 5.0e-6, 4.9e-5, 1.0e-4, 1.05e-4];
const VOLTAGES: [f64; 7] = [1.4, 1.6, 1.8, 2.0, 2.2, 2.4, 2.6];

fn sweep_record(currents: &[f64], voltages: &[f64]) -> String {
    let mut record = String::from("<Dataset>");
    for (c, v) in currents.iter().zip(voltages.iter()) {
        record.push_str(&format!(
            "<Current><Mean>{:e}</Mean><Std>1e-10</Std></Current>\
             <Voltage><Mean>{}</Mean><Std>0.001</Std></Voltage>",
            c, v
        ));
    }
    record.push_str("</Dataset>");
    record
}

fn document(records: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Measurement>{}</Measurement>",
        records.concat()
    )
}

/// Full pipeline: write a document, load it, and run both estimators.
#[test]
fn test_load_and_estimate_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.xml");
    fs::write(
        &path,
        document(&[sweep_record(&CURRENTS, &VOLTAGES)]),
    )
    .unwrap();

    let series = load_sweeps(&path).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].len(), 7);
    assert!(series[0].validate().is_ok());

    let fit = steepest_slope(&series[0]).unwrap();
    assert!(fit.estimate.volts > 1.8 && fit.estimate.volts < 2.2);
    assert!(fit.estimate.error > 0.0 && fit.estimate.error.is_finite());

    // The curvature of this sweep peaks at the 2.0 V sample, with a
    // one-sample-spacing resolution bound.
    let peak = second_derivative_peak(&series[0]).unwrap();
    assert!((peak.volts - 2.0).abs() < 1e-9);
    assert!((peak.error - 0.2).abs() < 1e-9);
}

/// A degenerate sweep fails with a reportable error while the other sweeps
/// in the series still produce estimates.
#[test]
fn test_degenerate_sweep_skipped_others_continue() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.xml");
    let flat = [1.0e-9; 7];
    fs::write(
        &path,
        document(&[
            sweep_record(&CURRENTS, &VOLTAGES),
            sweep_record(&flat, &VOLTAGES),
            sweep_record(&CURRENTS, &VOLTAGES),
        ]),
    )
    .unwrap();

    let series = load_sweeps(&path).unwrap();
    assert_eq!(series.len(), 3);

    let fits: Vec<_> = series.iter().map(steepest_slope).collect();
    assert!(fits[0].is_ok());
    assert_eq!(fits[1].as_ref().unwrap_err(), &EstimateError::NoValidSlope);
    assert!(fits[2].is_ok());

    let peaks: Vec<_> = series.iter().map(second_derivative_peak).collect();
    assert!(peaks[0].is_ok());
    // Flat current: the second derivative is identically zero, so the
    // "maximum" falls on the window edge.
    assert_eq!(
        peaks[1].as_ref().unwrap_err(),
        &EstimateError::PeakAtBoundary
    );
    assert!(peaks[2].is_ok());
}

/// A ragged sweep surfaces as a dimension mismatch, not an index panic.
#[test]
fn test_ragged_sweep_reports_dimension_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.xml");
    let mut record = sweep_record(&CURRENTS, &VOLTAGES);
    // Append one extra current entry with no matching voltage.
    record = record.replace(
        "</Dataset>",
        "<Current><Mean>2e-4</Mean><Std>1e-10</Std></Current></Dataset>",
    );
    fs::write(&path, document(&[record])).unwrap();

    let series = load_sweeps(&path).unwrap();
    assert_eq!(series.len(), 1);
    assert!(matches!(
        steepest_slope(&series[0]).unwrap_err(),
        EstimateError::DimensionMismatch {
            currents: 8,
            voltages: 7
        }
    ));
}

/// Conflicting graph selections abort before any loading or file I/O.
#[test]
fn test_incompatible_selection_aborts_before_io() {
    let config = AnalysisConfig {
        iv_graph: true,
        steepest_line: false,
        derivative: false,
        dvt_over_time: true,
        lvt_over_time: false,
    };
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::IncompatibleGraphSelection
    );
}

/// The output image name carries the input stem and the mode suffix.
#[test]
fn test_output_path_mode_suffixes() {
    let input = std::path::Path::new("Data/Ba133_uniradiated_linear.xml");

    let iv = AnalysisConfig::default();
    assert_eq!(
        output_path(input, None, iv.mode_suffix()),
        std::path::Path::new("Data/Ba133_uniradiated_linear_iv.png")
    );

    let time = AnalysisConfig {
        iv_graph: false,
        steepest_line: false,
        derivative: false,
        dvt_over_time: true,
        lvt_over_time: false,
    };
    assert_eq!(
        output_path(input, Some(std::path::Path::new("Graphs")), time.mode_suffix()),
        std::path::Path::new("Graphs/Ba133_uniradiated_linear_VtT.png")
    );
}
