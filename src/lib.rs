//! Real-time acoustic activation scoring.
//!
//! The engine ingests interleaved audio blocks on the audio thread,
//! accumulates 2048-sample analysis frames, and derives four normalized
//! features (spectral centroid, spectral harshness, dynamic variability,
//! temporal unpredictability) plus a composite 0-100 activation score. High
//! scores mark calm environments, low scores stimulating ones. Results are
//! published through lock-free atomics for concurrent readers, and an
//! optional recording log captures every analyzed frame for CSV export.

/// Feature extraction and scoring over magnitude spectra.
pub mod analysis;
/// Normalization and scoring parameters.
pub mod config;
/// Block ingestion, frame assembly, and metric publication.
pub mod engine;
/// CSV rendering and sink delivery of recorded sessions.
pub mod export;
/// Timestamped metric capture while recording.
pub mod recording;

pub use analysis::{FRAME_SIZE, SPECTRUM_BINS, ScoreBand};
pub use config::{EngineConfig, ScoreWeights};
pub use engine::{ActivationEngine, EngineHandle, HISTORY_LEN, MetricSnapshot};
pub use export::{
    CSV_HEADER, CsvFileSink, DEFAULT_EXPORT_FILE_NAME, ExportError, ExportReceipt, ExportSink,
    SinkError,
};
pub use recording::DataPoint;
