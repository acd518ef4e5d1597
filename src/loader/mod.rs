//! Streaming measurement-document parser using quick-xml
//!
//! The input document is a hierarchical XML file: the root element holds an
//! ordered list of sweep records, and each record holds an ordered list of
//! entries tagged either `Current` or `Voltage`. Each entry carries exactly
//! two numeric child fields, read positionally as (mean, standard deviation):
//!
//! ```xml
//! <Measurement>
//!   <Dataset>
//!     <Current><Mean>1.0e-9</Mean><Std>1.0e-10</Std></Current>
//!     <Voltage><Mean>1.4</Mean><Std>0.001</Std></Voltage>
//!   </Dataset>
//! </Measurement>
//! ```
//!
//! The loader performs no reordering, filtering, or cross-array validation:
//! a record with mismatched current/voltage counts is passed through as-is
//! and surfaces later via [`Sweep::validate`](crate::sweep::Sweep::validate).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::sweep::{Sweep, SweepSeries};

pub use error::ParseError;

mod error;


/// Which measurement channel an entry belongs to.
enum Channel {
    Current,
    Voltage,
}

impl Channel {
    fn name(&self) -> &'static str {
        match self {
            Channel::Current => "Current",
            Channel::Voltage => "Voltage",
        }
    }
}

/// Load a [`SweepSeries`] from a measurement document on disk.
pub fn load_sweeps(path: &Path) -> Result<SweepSeries, ParseError> {
    let file = File::open(path)?;
    parse_sweeps(BufReader::new(file))
}

/// Parse a measurement document from any buffered reader.
///
/// Element names are only significant at the entry level (`Current` vs
/// `Voltage`); the root and record names, and the names of the two leaf
/// fields, are not checked. Entries with an unrecognized tag are skipped.
pub fn parse_sweeps<R: BufRead>(reader: R) -> Result<SweepSeries, ParseError> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(true);

    let mut series: SweepSeries = Vec::new();
    let mut sweep: Option<Sweep> = None;
    let mut channel: Option<Channel> = None;
    // Numeric leaves of the current entry, in document order.
    let mut fields: Vec<f64> = Vec::new();

    let mut depth = 0usize;
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                match depth {
                    2 => sweep = Some(Sweep::default()),
                    3 => {
                        channel = match e.name().as_ref() {
                            b"Current" => Some(Channel::Current),
                            b"Voltage" => Some(Channel::Voltage),
                            _ => None,
                        };
                        fields.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref t)) => {
                // Leaf content of a recognized entry; everything else is
                // ignored, matching the positional read of the two fields.
                if depth >= 4 && channel.is_some() {
                    let text = t.unescape()?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let value: f64 = trimmed
                            .parse()
                            .map_err(|_| ParseError::InvalidNumber(trimmed.to_string()))?;
                        fields.push(value);
                    }
                }
            }
            Ok(Event::End(_)) => {
                match depth {
                    3 => {
                        if let Some(chan) = channel.take() {
                            let record = sweep.as_mut().ok_or_else(|| {
                                ParseError::InvalidStructure(
                                    "entry outside a sweep record".to_string(),
                                )
                            })?;
                            if fields.len() < 2 {
                                return Err(ParseError::InvalidStructure(format!(
                                    "{} entry needs a mean and a standard deviation",
                                    chan.name()
                                )));
                            }
                            match chan {
                                Channel::Current => {
                                    record.currents.push(fields[0]);
                                    record.current_std.push(fields[1]);
                                }
                                Channel::Voltage => {
                                    record.voltages.push(fields[0]);
                                    record.voltage_std.push(fields[1]);
                                }
                            }
                        }
                    }
                    2 => {
                        if let Some(record) = sweep.take() {
                            series.push(record);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(series)
}
