use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use thiserror::Error;
use tracing::{info, warn};

/// File name offered to hosts that have no better suggestion.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "acoustic_data.csv";

/// Delivery summary reported through the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReceipt {
    /// Number of data rows delivered, header excluded.
    pub data_points: usize,
    /// Size of the delivered text in bytes.
    pub bytes: usize,
}

/// Errors produced by a sink while delivering CSV text.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write CSV to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Export sink failed: {detail}")]
    Failed { detail: String },
}

/// Destination for rendered CSV text. The write runs on a dedicated export
/// thread, so implementations must not assume any particular caller thread.
pub trait ExportSink: Send {
    fn write(&mut self, csv: &str) -> Result<(), SinkError>;
}

/// Sink writing the whole CSV blob to one file path.
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for CsvFileSink {
    fn write(&mut self, csv: &str) -> Result<(), SinkError> {
        fs::write(&self.path, csv).map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Hands the rendered text to the sink on a spawned thread and reports the
/// outcome once through `on_done`. One attempt; no retries.
pub(crate) fn write_async<S, F>(mut sink: S, csv: String, data_points: usize, on_done: F)
where
    S: ExportSink + 'static,
    F: FnOnce(Result<ExportReceipt, SinkError>) + Send + 'static,
{
    thread::spawn(move || {
        let bytes = csv.len();
        let result = sink.write(&csv).map(|()| ExportReceipt { data_points, bytes });
        match &result {
            Ok(receipt) => info!(
                "Exported {} data points ({} bytes)",
                receipt.data_points, receipt.bytes
            ),
            Err(error) => warn!("CSV export failed: {error}"),
        }
        on_done(result);
    });
}
