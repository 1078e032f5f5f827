//! Delimited-text (CSV-like) reader used by `organize`.
//!
//! The reader is always flexible: rows may carry different numbers of
//! fields and that alone is never an error. Empty lines are skipped.

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::Records;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Reader settings for delimited-text sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedReader {
    delimiter: u8,
    has_headers: bool,
    trim_fields: bool,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            trim_fields: false,
        }
    }
}

impl DelimitedReader {
    /// Build a reader from the delimited-text settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the delimiter is not ASCII.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            has_headers: config.has_headers,
            trim_fields: config.trim_fields,
        })
    }

    /// Read every row of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be opened and
    /// [`PipelineError::Delimited`] if a row cannot be parsed.
    pub fn read_path(&self, path: &Path) -> Result<Records, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, &e))?;
        let records = self.read(file, path)?;
        trace!("read {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read every row from `reader`. `origin` labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Delimited`] if a row cannot be parsed, or
    /// [`PipelineError::Io`] if the underlying reader fails.
    pub fn read<R: Read>(&self, reader: R, origin: &Path) -> Result<Records, PipelineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(if self.trim_fields { Trim::All } else { Trim::None })
            .from_reader(reader);

        let mut records = Records::new();
        for result in rdr.records() {
            let record = result.map_err(|e| map_csv_error(origin, e))?;
            records.push(record.iter().map(str::to_owned).collect());
        }
        Ok(records)
    }
}

fn map_csv_error(origin: &Path, err: csv::Error) -> PipelineError {
    let line = err.position().map(csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => PipelineError::io(origin, &io_err),
        _ => PipelineError::Delimited {
            path: origin.to_path_buf(),
            line,
            message,
        },
    }
}
