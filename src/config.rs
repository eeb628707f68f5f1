use serde::{Deserialize, Serialize};

/// Normalization and scoring parameters for the analysis pipeline.
///
/// The defaults are research placeholders pending perceptual calibration;
/// hosts may deserialize overrides, with missing fields falling back to the
/// defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Centroid frequency mapped to a feature value of 1.0.
    pub centroid_ceiling_hz: f32,
    /// Boundary between the low and high halves of the harshness ratio.
    pub harshness_crossover_hz: f32,
    /// Multiplier applied to the raw high-frequency energy ratio.
    pub harshness_gain: f32,
    /// Multiplier applied to the loudness standard deviation.
    pub variability_gain: f32,
    /// Multiplier applied to the mean absolute loudness delta.
    pub unpredictability_gain: f32,
    pub weights: ScoreWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            centroid_ceiling_hz: 8_000.0,
            harshness_crossover_hz: 2_000.0,
            harshness_gain: 2.0,
            variability_gain: 20.0,
            unpredictability_gain: 50.0,
            weights: ScoreWeights::default(),
        }
    }
}

/// Blend weights applied to the inverted features. Expected to sum to 1.0 so
/// the composite score spans the full 0-100 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    pub spectral_centroid: f32,
    pub spectral_harshness: f32,
    pub dynamic_variability: f32,
    pub temporal_unpredictability: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            spectral_centroid: 0.25,
            spectral_harshness: 0.35,
            dynamic_variability: 0.20,
            temporal_unpredictability: 0.20,
        }
    }
}
