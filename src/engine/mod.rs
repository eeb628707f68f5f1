//! Block ingestion, frame assembly, and metric publication.

use std::sync::Arc;

use tracing::debug;

use crate::analysis::features;
use crate::analysis::score;
use crate::analysis::spectrum::SpectrumAnalyzer;
use crate::config::EngineConfig;
use crate::export::sink::{self, ExportReceipt, ExportSink, SinkError};
use crate::export::{ExportError, csv};
use crate::recording::{DataPoint, RecordingLog};
use frame::FrameAccumulator;
use history::LoudnessHistory;
use shared::SharedMetrics;

pub(crate) mod frame;
pub(crate) mod history;
pub(crate) mod shared;

pub use history::HISTORY_LEN;
pub use shared::MetricSnapshot;

/// Rate assumed when a host reports a non-finite or non-positive one.
pub(crate) const FALLBACK_SAMPLE_RATE: f64 = 44_100.0;

struct SharedState {
    metrics: SharedMetrics,
    recording: RecordingLog,
}

impl SharedState {
    fn points_for_export(&self) -> Result<Vec<DataPoint>, ExportError> {
        let points = self.recording.points();
        if points.is_empty() {
            return Err(ExportError::EmptyLog);
        }
        Ok(points)
    }
}

/// Producer half of the engine. Owned by the audio thread; everything it
/// publishes is readable concurrently through [`EngineHandle`] clones.
pub struct ActivationEngine {
    config: EngineConfig,
    frame: FrameAccumulator,
    history: LoudnessHistory,
    spectrum: SpectrumAnalyzer,
    history_scratch: Vec<f32>,
    shared: Arc<SharedState>,
}

impl ActivationEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        debug!("Creating activation engine");
        Self {
            config,
            frame: FrameAccumulator::new(),
            history: LoudnessHistory::new(),
            spectrum: SpectrumAnalyzer::new(),
            history_scratch: Vec::with_capacity(HISTORY_LEN),
            shared: Arc::new(SharedState {
                metrics: SharedMetrics::new(),
                recording: RecordingLog::new(),
            }),
        }
    }

    /// Returns a cloneable consumer handle backed by the same shared state.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Feeds one interleaved block. Only channel 0 is analyzed. Loudness and
    /// history update once per block; zero or more frame analyses run
    /// synchronously before this returns.
    pub fn ingest(&mut self, samples: &[f32], channels: usize, sample_rate: f64) {
        if samples.is_empty() {
            return;
        }
        let channels = channels.max(1);
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            FALLBACK_SAMPLE_RATE
        };

        let rms = channel_rms(samples, channels);
        self.shared.metrics.rms_level.store(rms);
        self.history.push(rms);

        for frame_samples in samples.chunks(channels) {
            if self.frame.push(sanitize(frame_samples[0])) {
                self.analyze_frame(sample_rate);
            }
        }
    }

    fn analyze_frame(&mut self, sample_rate: f64) {
        self.history.copy_ordered_into(&mut self.history_scratch);
        let magnitudes = self.spectrum.process(self.frame.samples());
        let features =
            features::extract(magnitudes, &self.history_scratch, sample_rate, &self.config);
        let score = score::activation_score(&features, &self.config.weights);
        self.shared.metrics.publish_frame(&features, score);
        let rms_level = self.shared.metrics.rms_level.load();
        self.shared
            .recording
            .append_if_active(|elapsed_seconds| DataPoint {
                elapsed_seconds,
                activation_score: score,
                spectral_centroid: features.spectral_centroid,
                spectral_harshness: features.spectral_harshness,
                dynamic_variability: features.dynamic_variability,
                temporal_unpredictability: features.temporal_unpredictability,
                rms_level,
            });
    }

    pub fn spectral_centroid(&self) -> f32 {
        self.shared.metrics.spectral_centroid.load()
    }

    pub fn spectral_harshness(&self) -> f32 {
        self.shared.metrics.spectral_harshness.load()
    }

    pub fn dynamic_variability(&self) -> f32 {
        self.shared.metrics.dynamic_variability.load()
    }

    pub fn temporal_unpredictability(&self) -> f32 {
        self.shared.metrics.temporal_unpredictability.load()
    }

    pub fn rms_level(&self) -> f32 {
        self.shared.metrics.rms_level.load()
    }

    pub fn activation_score(&self) -> f32 {
        self.shared.metrics.activation_score.load()
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.shared.metrics.snapshot()
    }

    pub fn start_recording(&self) {
        self.shared.recording.start();
    }

    pub fn stop_recording(&self) {
        self.shared.recording.stop();
    }

    pub fn is_recording(&self) -> bool {
        self.shared.recording.is_active()
    }

    pub fn recording_elapsed_seconds(&self) -> f64 {
        self.shared.recording.elapsed_seconds()
    }

    pub fn data_point_count(&self) -> usize {
        self.shared.recording.len()
    }

    pub fn data_points(&self) -> Vec<DataPoint> {
        self.shared.recording.points()
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        Ok(csv::serialize(&self.shared.points_for_export()?))
    }

    pub fn export_csv_to<S, F>(&self, sink: S, on_done: F) -> Result<(), ExportError>
    where
        S: ExportSink + 'static,
        F: FnOnce(Result<ExportReceipt, SinkError>) + Send + 'static,
    {
        let points = self.shared.points_for_export()?;
        sink::write_async(sink, csv::serialize(&points), points.len(), on_done);
        Ok(())
    }
}

impl Default for ActivationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable consumer handle. Metric reads are wait-free; recording control
/// and log reads take the short log lock.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Arc<SharedState>,
}

impl EngineHandle {
    pub fn spectral_centroid(&self) -> f32 {
        self.shared.metrics.spectral_centroid.load()
    }

    pub fn spectral_harshness(&self) -> f32 {
        self.shared.metrics.spectral_harshness.load()
    }

    pub fn dynamic_variability(&self) -> f32 {
        self.shared.metrics.dynamic_variability.load()
    }

    pub fn temporal_unpredictability(&self) -> f32 {
        self.shared.metrics.temporal_unpredictability.load()
    }

    pub fn rms_level(&self) -> f32 {
        self.shared.metrics.rms_level.load()
    }

    pub fn activation_score(&self) -> f32 {
        self.shared.metrics.activation_score.load()
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.shared.metrics.snapshot()
    }

    pub fn start_recording(&self) {
        self.shared.recording.start();
    }

    pub fn stop_recording(&self) {
        self.shared.recording.stop();
    }

    pub fn is_recording(&self) -> bool {
        self.shared.recording.is_active()
    }

    pub fn recording_elapsed_seconds(&self) -> f64 {
        self.shared.recording.elapsed_seconds()
    }

    pub fn data_point_count(&self) -> usize {
        self.shared.recording.len()
    }

    pub fn data_points(&self) -> Vec<DataPoint> {
        self.shared.recording.points()
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        Ok(csv::serialize(&self.shared.points_for_export()?))
    }

    pub fn export_csv_to<S, F>(&self, sink: S, on_done: F) -> Result<(), ExportError>
    where
        S: ExportSink + 'static,
        F: FnOnce(Result<ExportReceipt, SinkError>) + Send + 'static,
    {
        let points = self.shared.points_for_export()?;
        sink::write_async(sink, csv::serialize(&points), points.len(), on_done);
        Ok(())
    }
}

fn channel_rms(samples: &[f32], channels: usize) -> f32 {
    let mut sum = 0.0_f64;
    let mut count = 0usize;
    for frame in samples.chunks(channels) {
        let sample = sanitize(frame[0]) as f64;
        sum += sample * sample;
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    ((sum / count as f64).max(0.0).sqrt()) as f32
}

fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::spectrum::FRAME_SIZE;

    #[test]
    fn channel_rms_reads_first_channel_only() {
        let mono = channel_rms(&[0.5, 0.5, 0.5, 0.5], 1);
        let stereo = channel_rms(&[0.5, 0.0, 0.5, 0.0], 2);
        assert!((mono - 0.5).abs() < 1e-6);
        assert!((stereo - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_samples_count_as_silence() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::INFINITY), 0.0);
        assert_eq!(sanitize(-0.25), -0.25);
        let rms = channel_rms(&[f32::NAN, f32::NAN], 1);
        assert_eq!(rms, 0.0);
    }

    #[test]
    fn empty_block_changes_nothing() {
        let mut engine = ActivationEngine::new();
        engine.ingest(&[0.5; 64], 1, 44_100.0);
        let before = engine.rms_level();
        engine.ingest(&[], 1, 44_100.0);
        assert_eq!(engine.rms_level(), before);
    }

    #[test]
    fn loudness_publishes_per_block_score_per_frame() {
        let mut engine = ActivationEngine::new();
        engine.ingest(&[0.5; 128], 1, 44_100.0);
        assert!((engine.rms_level() - 0.5).abs() < 1e-6);
        assert_eq!(engine.activation_score(), 50.0);
    }

    #[test]
    fn degenerate_channel_and_rate_inputs_fall_back() {
        let mut engine = ActivationEngine::new();
        let block = vec![0.1_f32; FRAME_SIZE];
        engine.ingest(&block, 0, f64::NAN);
        assert!(engine.activation_score().is_finite());
        assert_ne!(engine.activation_score(), 50.0);
    }
}
