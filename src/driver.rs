//! Record-at-a-time control loop.
//!
//! Each input record is fully read, filtered and (optionally) written before
//! the next one is read. The first record is always emitted so a header line
//! survives filters that reject it.

use std::io::{BufWriter, Read, Write};

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::filter;
use crate::projector::Projection;
use crate::record::Record;
use crate::source::RecordSource;

/// Whether the header exemption is still available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Header,
    Streaming,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: u64,
    pub records_written: u64,
}

/// Runs one configured pass from an input stream to an output stream.
pub struct Driver {
    config: Config,
    projection: Projection,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        let projection = Projection::new(config.select.clone(), config.delimiter);
        Self { config, projection }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process `input` to completion, writing accepted records to `output`.
    ///
    /// The output is flushed before returning, on success and on error.
    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> Result<RunSummary> {
        let mut out = BufWriter::new(output);
        let result = self.drive(input, &mut out);
        let flushed = out.flush();
        let summary = result?;
        flushed?;
        debug!(
            read = summary.records_read,
            written = summary.records_written,
            "run complete"
        );
        Ok(summary)
    }

    fn drive<R: Read, W: Write>(&self, input: R, out: &mut W) -> Result<RunSummary> {
        let source = RecordSource::new(input, self.config.delimiter);
        let mut summary = RunSummary::default();
        let mut state = RunState::Header;

        for record in source {
            let record = record?;
            summary.records_read += 1;

            if self.config.enum_header {
                debug!(fields = record.len(), "enumerating header");
                enumerate_fields(&record, out)?;
                break;
            }

            let passed = filter::passes(&record, &self.config.filters)?;
            if passed || state == RunState::Header {
                if !passed {
                    debug!(line = record.line(), "header exempt from filters");
                }
                let line = self.projection.render(&record)?;
                writeln!(out, "{line}")?;
                summary.records_written += 1;
                state = RunState::Streaming;
            } else {
                debug!(line = record.line(), "record dropped");
            }
        }

        Ok(summary)
    }
}

/// Write `index: value` for every field, index right-aligned to width 3.
fn enumerate_fields<W: Write>(record: &Record, out: &mut W) -> Result<()> {
    for (i, value) in record.fields().iter().enumerate() {
        writeln!(out, "{i:>3}: {value}")?;
    }
    Ok(())
}
