//! CSV rendering and sink delivery of recorded sessions.

use thiserror::Error;

pub(crate) mod csv;
pub(crate) mod sink;

pub use csv::CSV_HEADER;
pub use sink::{CsvFileSink, DEFAULT_EXPORT_FILE_NAME, ExportReceipt, ExportSink, SinkError};

/// Errors surfaced synchronously when an export is requested.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The recording log holds no data points.
    #[error("Recording log is empty; nothing to export")]
    EmptyLog,
}
