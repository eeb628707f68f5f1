use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::analysis::features::FrameFeatures;

/// `f32` published through bit casts so readers never take a lock.
pub(crate) struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    pub(crate) fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    pub(crate) fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Latest published metrics. Each field is an independent atomic; a reader
/// may observe values from two adjacent frames.
pub(crate) struct SharedMetrics {
    pub(crate) spectral_centroid: AtomicF32,
    pub(crate) spectral_harshness: AtomicF32,
    pub(crate) dynamic_variability: AtomicF32,
    pub(crate) temporal_unpredictability: AtomicF32,
    pub(crate) rms_level: AtomicF32,
    pub(crate) activation_score: AtomicF32,
}

impl SharedMetrics {
    /// The score starts at the scale midpoint until the first frame completes.
    pub(crate) fn new() -> Self {
        Self {
            spectral_centroid: AtomicF32::new(0.0),
            spectral_harshness: AtomicF32::new(0.0),
            dynamic_variability: AtomicF32::new(0.0),
            temporal_unpredictability: AtomicF32::new(0.0),
            rms_level: AtomicF32::new(0.0),
            activation_score: AtomicF32::new(50.0),
        }
    }

    /// Stores the per-frame outputs. The loudness level updates separately at
    /// block cadence.
    pub(crate) fn publish_frame(&self, features: &FrameFeatures, score: f32) {
        self.spectral_centroid.store(features.spectral_centroid);
        self.spectral_harshness.store(features.spectral_harshness);
        self.dynamic_variability.store(features.dynamic_variability);
        self.temporal_unpredictability
            .store(features.temporal_unpredictability);
        self.activation_score.store(score);
    }

    pub(crate) fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            spectral_centroid: self.spectral_centroid.load(),
            spectral_harshness: self.spectral_harshness.load(),
            dynamic_variability: self.dynamic_variability.load(),
            temporal_unpredictability: self.temporal_unpredictability.load(),
            rms_level: self.rms_level.load(),
            activation_score: self.activation_score.load(),
        }
    }
}

/// Point-in-time copy of the published metrics. Fields are loaded
/// independently and may straddle a frame boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    pub spectral_centroid: f32,
    pub spectral_harshness: f32,
    pub dynamic_variability: f32,
    pub temporal_unpredictability: f32,
    pub rms_level: f32,
    pub activation_score: f32,
}
