use crate::analysis::features::FrameFeatures;
use crate::config::ScoreWeights;

/// Blends the inverted features into a 0-100 activation score. High scores
/// mark calm environments, low scores stimulating ones.
pub(crate) fn activation_score(features: &FrameFeatures, weights: &ScoreWeights) -> f32 {
    let calm = weights.spectral_centroid as f64 * (1.0 - features.spectral_centroid as f64)
        + weights.spectral_harshness as f64 * (1.0 - features.spectral_harshness as f64)
        + weights.dynamic_variability as f64 * (1.0 - features.dynamic_variability as f64)
        + weights.temporal_unpredictability as f64
            * (1.0 - features.temporal_unpredictability as f64);
    ((calm * 100.0) as f32).clamp(0.0, 100.0)
}

/// Coarse interpretation of an activation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Stimulating,
    Neutral,
    Calming,
}

impl ScoreBand {
    pub fn from_score(score: f32) -> Self {
        if score > 70.0 {
            Self::Calming
        } else if score > 40.0 {
            Self::Neutral
        } else {
            Self::Stimulating
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Calming => "Low Arousal - Calming",
            Self::Neutral => "Medium Arousal - Neutral",
            Self::Stimulating => "High Arousal - Stimulating",
        }
    }
}
