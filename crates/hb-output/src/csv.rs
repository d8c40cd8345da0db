//! CSV trace backend.
//!
//! Creates `activation_trace.csv` in the configured output directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, TraceRow};

pub const TRACE_FILE: &str = "activation_trace.csv";

/// Writes activation rows to a single CSV file with a header.
pub struct CsvTraceWriter {
    out:      Writer<File>,
    path:     PathBuf,
    rows:     u64,
    finished: bool,
}

impl CsvTraceWriter {
    /// Create `activation_trace.csv` in `dir`, which must exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let path = dir.join(TRACE_FILE);
        // Header written once here; rows are serialized without one.
        let mut out = csv::WriterBuilder::new().has_headers(false).from_path(&path)?;
        out.write_record([
            "instance", "frame", "order", "option", "depth", "state", "option_time", "state_time",
            "arguments",
        ])?;
        Ok(Self { out, path, rows: 0, finished: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_rows(&mut self, rows: &[TraceRow]) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        for row in rows {
            self.out.serialize(row)?;
        }
        self.rows += rows.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        tracing::debug!(path = %self.path.display(), rows = self.rows, "trace written");
        Ok(())
    }
}
